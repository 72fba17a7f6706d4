use std::f32::consts::PI;

use nalgebra::Vector3;

use crate::config::Config;
use crate::i2c::I2CBit;

use super::calibration::CalibrationResult;
use super::error::{MagError, MagResult};
use super::registry;

/// Correction active du capteur, identité tant qu'aucune calibration n'a
/// été installée. Remplacée en bloc, jamais modifiée champ par champ.
#[derive(Clone, Copy, Debug)]
struct Correction {
    offset: Vector3<f32>,
    scale: Vector3<f32>,
}

impl Correction {
    fn identite() -> Self {
        Correction {
            offset: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Cherche la sensibilité dans la table du capteur.
/// Renvoie (valeur du registre de gain, facteur d'échelle).
pub(crate) fn gauss_table(gauss: f32) -> MagResult<(u8, f32)> {
    registry::HMC5883L_GAUSS_SCALES
        .iter()
        .find(|(g, _, _)| *g == gauss)
        .map(|(_, reg, scale)| (*reg, *scale))
        .ok_or(MagError::InvalidGauss(gauss))
}

pub(crate) struct HMC5883L {
    decl_degrees: f32,
    decl_minutes: f32,
    mag_decl: f32,
    scale: f32,
    heading_samples: u32,
    correction: Correction,
}

impl HMC5883L {
    /// Constructeur
    pub(crate) fn new<B: I2CBit>(i2c: &mut B, config: &Config) -> MagResult<Self> {
        // La sensibilité est validée avant de toucher au bus
        let (_gain_reg, scale) = gauss_table(config.gauss)?;

        let (degrees, minutes) = config.declination;
        let mut mag = Self {
            decl_degrees: degrees,
            decl_minutes: minutes,
            mag_decl: (degrees + minutes / 60.0) * PI / 180.0,
            scale,
            heading_samples: config.heading_samples,
            correction: Correction::identite(),
        };

        mag.init_module(i2c)?;

        Ok(mag)
    }

    /// Initialise rapidement le module avec des valeurs pré-défini
    fn init_module<B: I2CBit>(&mut self, i2c: &mut B) -> MagResult<()> {
        println!("[MAG] Initialisation (CONF A) ...");

        // 8 mesures moyennées, 15 Hz, mesure normale
        i2c.ecriture_word(registry::HMC5883L_CONF_A, 0x70)?;

        println!("[MAG] Initialisation (CONF B) ...");
        // TODO: écrire la valeur de gain de la table (reg << 5) une fois
        // vérifiée sur le capteur, le registre reste figé à 0xA0
        i2c.ecriture_word(registry::HMC5883L_CONF_B, 0xA0)?;

        // Activation de la mesure continue
        println!("[MAG] Initialisation (MODE) ...");
        i2c.ecriture_word(registry::HMC5883L_MODE, 0x00)?;

        println!("[MAG] Fin d'initialisation.");

        Ok(())
    }

    /// Décode une valeur 16 bits en complément à deux dans le bloc, puis
    /// la met à l'échelle (milligauss) avec un arrondi à 4 décimales.
    fn convert(&self, data: &[u8], offset: usize) -> MagResult<f32> {
        let mut val = ((data[offset] as i32) << 8) | data[offset + 1] as i32;
        if val & 0x8000 != 0 {
            val -= 1 << 16;
        }

        // La sentinelle doit rester distinguable d'un zéro valide
        if val == registry::HMC5883L_OVERFLOW {
            return Err(MagError::Overflow);
        }

        Ok((val as f32 * self.scale * 10000.0).round() / 10000.0)
    }

    /// Récupére les trois axes (RAW mis à l'échelle, sans correction)
    pub(crate) fn get_mag_axes_raw<B: I2CBit>(&self, i2c: &mut B) -> MagResult<Vector3<f32>> {
        let mut data = [0u8; registry::HMC5883L_BLOC_LEN];
        i2c.lecture_bloc(registry::HMC5883L_BLOC, &mut data)?;

        // L'ordre sur le fil est X, Z, Y
        let raw_x = self.convert(&data, registry::HMC5883L_X_OFFSET)?;
        let raw_z = self.convert(&data, registry::HMC5883L_Z_OFFSET)?;
        let raw_y = self.convert(&data, registry::HMC5883L_Y_OFFSET)?;

        Ok(Vector3::new(raw_x, raw_y, raw_z))
    }

    /// Récupére les axes corrigés ("hard iron" & "soft iron")
    pub(crate) fn get_mag_axes<B: I2CBit>(&self, i2c: &mut B) -> MagResult<Vector3<f32>> {
        let raw = self.get_mag_axes_raw(i2c)?;

        Ok((raw - self.correction.offset).component_mul(&self.correction.scale))
    }

    /// Installe une nouvelle correction, remplace l'ancienne en bloc
    pub(crate) fn set_calibration(&mut self, cal: CalibrationResult) {
        self.correction = Correction {
            offset: cal.offset,
            scale: cal.scale,
        };
    }

    /// Calcul du heading moyenné sur plusieurs lectures, prend en compte
    /// la déclinaison magnétique. Les lectures en échec sont ignorées,
    /// seules les lectures réussies comptent dans la moyenne.
    pub(crate) fn get_heading<B: I2CBit>(&self, i2c: &mut B) -> MagResult<f32> {
        let mut sum_x = 0.0f32;
        let mut sum_y = 0.0f32;
        let mut succes = 0u32;

        for _ in 0..self.heading_samples {
            match self.get_mag_axes(i2c) {
                Ok(axes) => {
                    // Z est lu mais n'entre pas dans le heading 2D
                    sum_x += axes.x;
                    sum_y += axes.y;
                    succes += 1;
                }
                Err(_) => continue,
            }
        }

        if succes == 0 {
            return Err(MagError::NoSignal(self.heading_samples));
        }

        let mut heading_rad = (sum_x / succes as f32).atan2(sum_y / succes as f32);
        heading_rad += self.mag_decl;

        // Repli dans [0, 2π), une seule des deux branches par appel
        if heading_rad < 0.0 {
            heading_rad += 2.0 * PI;
        } else if heading_rad > 2.0 * PI {
            heading_rad -= 2.0 * PI;
        }

        let heading_deg = heading_rad * 180.0 / PI;

        // Bascule de 180°, les deux branches couvrent tout le domaine.
        // Comportement hérité, conservé tel quel.
        let heading_deg = if heading_deg >= 180.0 {
            heading_deg - 180.0
        } else {
            heading_deg + 180.0
        };

        Ok(heading_deg)
    }

    /// Déclinaison configurée (degrés, minutes)
    pub(crate) fn declination(&self) -> (f32, f32) {
        (self.decl_degrees, self.decl_minutes)
    }

    /// Converti un heading décimal en (degrés, minutes) pour l'affichage
    pub(crate) fn degrees(heading_deg: f32) -> (i32, i32) {
        let degrees = heading_deg.floor();
        let minutes = ((heading_deg - degrees) * 60.0).round();

        (degrees as i32, minutes as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i2c::fake::FakeI2c;

    fn config_test() -> Config {
        let mut config = Config::new();
        config.heading_samples = 10;
        config
    }

    #[test]
    fn table_des_sensibilites() {
        assert_eq!(gauss_table(8.10).unwrap(), (7, 4.35));
        assert_eq!(gauss_table(1.30).unwrap(), (1, 0.92));
        assert!(matches!(gauss_table(2.0), Err(MagError::InvalidGauss(_))));
    }

    #[test]
    fn gauss_inconnu_refuse_avant_le_bus() {
        let mut fake = FakeI2c::new();
        let mut config = config_test();
        config.gauss = 3.0;

        assert!(matches!(
            HMC5883L::new(&mut fake, &config),
            Err(MagError::InvalidGauss(_))
        ));
        assert!(fake.ecritures.is_empty());
    }

    #[test]
    fn initialisation_ecrit_les_trois_registres() {
        let mut fake = FakeI2c::new();
        HMC5883L::new(&mut fake, &config_test()).unwrap();

        assert_eq!(
            fake.ecritures,
            vec![(0x00, 0x70), (0x01, 0xA0), (0x02, 0x00)]
        );
    }

    #[test]
    fn decodage_du_bloc() {
        // Gauss 1.3 -> échelle 0.92, ordre fil X, Z, Y
        let mut fake = FakeI2c::with_axes(100, -200, 300);
        let mag = HMC5883L::new(&mut fake, &config_test()).unwrap();

        let axes = mag.get_mag_axes_raw(&mut fake).unwrap();
        assert_eq!(axes, Vector3::new(92.0, -184.0, 276.0));
    }

    #[test]
    fn sentinelle_de_saturation() {
        let mut fake = FakeI2c::with_axes(-4096, 10, 10);
        let mag = HMC5883L::new(&mut fake, &config_test()).unwrap();

        assert!(matches!(
            mag.get_mag_axes_raw(&mut fake),
            Err(MagError::Overflow)
        ));
    }

    #[test]
    fn correction_appliquee_aux_axes() {
        let mut fake = FakeI2c::with_axes(100, 200, 300);
        let mut mag = HMC5883L::new(&mut fake, &config_test()).unwrap();

        mag.set_calibration(CalibrationResult {
            offset: Vector3::new(92.0, 84.0, -24.0),
            scale: Vector3::new(2.0, 1.0, 0.5),
        });

        let axes = mag.get_mag_axes(&mut fake).unwrap();
        assert_eq!(axes, Vector3::new(0.0, 100.0, 150.0));
    }

    #[test]
    fn heading_au_nord_magnetique() {
        // atan2(0, +y) = 0 rad -> 0° avant la bascule, 180° après
        let mut fake = FakeI2c::with_axes(0, 100, 50);
        let mag = HMC5883L::new(&mut fake, &config_test()).unwrap();

        assert_eq!(mag.get_heading(&mut fake).unwrap(), 180.0);
    }

    #[test]
    fn heading_negatif_replie() {
        // atan2(-1, -1) = -3π/4 -> +2π = 225° -> bascule -> 45°
        let mut fake = FakeI2c::with_axes(-100, -100, 0);
        let mag = HMC5883L::new(&mut fake, &config_test()).unwrap();

        let heading = mag.get_heading(&mut fake).unwrap();
        assert!((heading - 45.0).abs() < 1e-3);
    }

    #[test]
    fn aucun_signal_si_toutes_les_lectures_echouent() {
        let mut fake = FakeI2c::with_axes(10, 10, 10);
        let mag = HMC5883L::new(&mut fake, &config_test()).unwrap();

        fake.en_panne = true;
        assert!(matches!(
            mag.get_heading(&mut fake),
            Err(MagError::NoSignal(10))
        ));
    }

    #[test]
    fn declinaison_dans_le_heading() {
        // Déclinaison de 90°: atan2(0, +y) = 0 -> π/2 -> 90° -> bascule -> 270°
        let mut fake = FakeI2c::with_axes(0, 100, 0);
        let mut config = config_test();
        config.declination = (90.0, 0.0);
        let mag = HMC5883L::new(&mut fake, &config).unwrap();

        assert_eq!(mag.declination(), (90.0, 0.0));
        let heading = mag.get_heading(&mut fake).unwrap();
        assert!((heading - 270.0).abs() < 1e-3);
    }

    #[test]
    fn conversion_en_degres_minutes() {
        assert_eq!(HMC5883L::degrees(180.5), (180, 30));
        assert_eq!(HMC5883L::degrees(0.0), (0, 0));
        assert_eq!(HMC5883L::degrees(359.99), (359, 59));
    }
}
