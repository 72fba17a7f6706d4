use std::fmt;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::Poll;
use std::thread;
use std::time::Duration;

use anyhow::anyhow;
use futures::Stream;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::i2c::I2CBit;

use super::calibration::Calibrator;
use super::error::MagResult;
use super::hmc5883l::HMC5883L;

#[cfg(feature = "fake-sensors")]
use rand::Rng;

#[derive(Clone, Copy, Serialize, Deserialize)]
pub(crate) struct Data {
    pub axes: (f32, f32, f32),
    pub declination: (f32, f32),
    pub heading: f32,
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (degrees, minutes) = HMC5883L::degrees(self.heading);

        write!(
            f,
            "Axis X: {}\nAxis Y: {}\nAxis Z: {}\nDeclination: ({}, {})\nHeading: ({}, {})",
            self.axes.0,
            self.axes.1,
            self.axes.2,
            self.declination.0,
            self.declination.1,
            degrees,
            minutes
        )
    }
}

/// Session de calibration: accumule les extrêmes pendant que la boussole
/// est tournée dans tous les sens, puis installe la correction obtenue.
/// Le capteur a un débit borné, d'où la pause entre deux échantillons.
pub(crate) fn session_calibration<B: I2CBit>(
    mag: &mut HMC5883L,
    i2c: &mut B,
    config: &Config,
    token: &CancellationToken,
) -> MagResult<()> {
    println!("[MAG] Calibration: tourner la boussole dans tous les sens ...");

    let mut cal = Calibrator::new();
    let mut iter = 0u32;

    while iter < config.calibration_samples && !token.is_cancelled() {
        iter += 1;

        // Les échantillons en échec (saturation, bus) sont ignorés
        if let Ok(axes) = mag.get_mag_axes(i2c) {
            cal.observe(axes);
        }

        if iter % 100 == 0 {
            println!("[MAG] Calibration: {}/{}", iter, config.calibration_samples);
        }

        thread::sleep(Duration::from_millis(10));
    }

    let result = cal.finalize()?;
    println!(
        "[MAG] Calibration terminée. Offset: {:?} Echelle: {:?}",
        result.offset, result.scale
    );

    mag.set_calibration(result);

    Ok(())
}

pub(crate) struct Reader {
    data: Arc<Mutex<anyhow::Result<Data>>>,
    token: CancellationToken,
}

impl Reader {
    pub(crate) fn new(token: CancellationToken, config: Config) -> anyhow::Result<Self> {
        // Donnée du capteur
        let data: Arc<Mutex<anyhow::Result<Data>>> = Arc::new(Mutex::new(Err(anyhow!("NOINIT"))));
        let data_thread = data.clone();

        let thread_token = token.clone();

        let reader = Reader { data, token };

        #[cfg(feature = "real-sensors")]
        {
            dbg!("[MAG] Démarrage du thread ...\n");
            thread::spawn(move || {
                let mut i2c = match rppal::i2c::I2c::with_bus(config.bus) {
                    Ok(i2c) => i2c,
                    Err(e) => {
                        *data_thread.lock().unwrap() = Err(anyhow!(e));
                        return;
                    }
                };

                if let Err(e) = i2c.set_slave_address(config.address) {
                    *data_thread.lock().unwrap() = Err(anyhow!(e));
                    return;
                }

                let mut mag = match HMC5883L::new(&mut i2c, &config) {
                    Ok(mag) => mag,
                    Err(e) => {
                        *data_thread.lock().unwrap() = Err(anyhow!(e));
                        return;
                    }
                };

                if config.calibrate {
                    // En cas d'échec la correction reste l'identité, la
                    // session est à relancer avec plus de rotations
                    if let Err(e) = session_calibration(&mut mag, &mut i2c, &config, &thread_token)
                    {
                        eprintln!("[MAG] Calibration échouée: {}", e);
                    }
                }

                while !thread_token.is_cancelled() {
                    let axes = mag.get_mag_axes(&mut i2c);
                    let heading = mag.get_heading(&mut i2c);

                    match (axes, heading) {
                        (Ok(axes), Ok(heading)) => {
                            let data = Data {
                                axes: (axes.x, axes.y, axes.z),
                                declination: mag.declination(),
                                heading,
                            };
                            *data_thread.lock().unwrap() = Ok(data);
                        }
                        (Err(e), _) | (_, Err(e)) => {
                            *data_thread.lock().unwrap() = Err(anyhow!(e));
                        }
                    }

                    thread::sleep(Duration::from_millis(500));
                }

                dbg!("[MAG] Fin du thread.\n");
            });
        }

        #[cfg(feature = "fake-sensors")]
        {
            dbg!("[MAG] Démarrage du thread [FAKE] ...\n");
            let declination = config.declination;
            thread::spawn(move || {
                let mut rng = rand::thread_rng();

                while !thread_token.is_cancelled() {
                    let x: f32 = rng.gen_range(-500.0..500.0);
                    let y: f32 = rng.gen_range(-500.0..500.0);
                    let z: f32 = rng.gen_range(-500.0..500.0);
                    let h: f32 = rng.gen_range(0.0..360.0);

                    let data = Data {
                        axes: (x, y, z),
                        declination,
                        heading: h,
                    };
                    *data_thread.lock().unwrap() = Ok(data);
                    thread::sleep(Duration::from_millis(500));
                }

                dbg!("[MAG] Fin du thread [FAKE].\n");
            });
        }

        Ok(reader)
    }
}

impl Stream for Reader {
    type Item = anyhow::Result<Data>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut std::task::Context<'_>) -> Poll<Option<Self::Item>> {
        if self.token.is_cancelled() {
            return Poll::Ready(None);
        }

        let data = match self.data.lock().unwrap().as_ref().copied() {
            Ok(val) => Poll::Ready(Some(Ok(val))),
            Err(_e) => Poll::Ready(Some(Err(anyhow!("MAGERR")))),
        };

        data
    }
}
