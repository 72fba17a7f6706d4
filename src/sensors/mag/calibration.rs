use nalgebra::Vector3;

use super::error::{MagError, MagResult};

// Sentinelles d'initialisation des extrêmes
const MIN_INIT: f32 = 1_000_000.0;
const MAX_INIT: f32 = -1_000_000.0;

/// Correction dérivée d'une session de calibration: offset "hard iron" à
/// soustraire et échelle "soft iron" à multiplier, par axe.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CalibrationResult {
    pub offset: Vector3<f32>,
    pub scale: Vector3<f32>,
}

/// Accumule les extrêmes par axe pendant que le capteur est tourné dans
/// toutes les orientations.
pub(crate) struct Calibrator {
    min: Vector3<f32>,
    max: Vector3<f32>,
    samples: u32,
}

impl Calibrator {
    pub(crate) fn new() -> Self {
        Calibrator {
            min: Vector3::new(MIN_INIT, MIN_INIT, MIN_INIT),
            max: Vector3::new(MAX_INIT, MAX_INIT, MAX_INIT),
            samples: 0,
        }
    }

    /// Mets à jour les minimums et maximums avec un échantillon.
    /// Les minimums ne peuvent que descendre, les maximums que monter.
    pub(crate) fn observe(&mut self, axes: Vector3<f32>) {
        self.min = self.min.inf(&axes);
        self.max = self.max.sup(&axes);
        self.samples += 1;
    }

    pub(crate) fn samples(&self) -> u32 {
        self.samples
    }

    pub(crate) fn min(&self) -> Vector3<f32> {
        self.min
    }

    pub(crate) fn max(&self) -> Vector3<f32> {
        self.max
    }

    /// Calcule l'offset (point médian des extrêmes) et l'échelle
    /// (équilibrage des demi-amplitudes entre les trois axes).
    pub(crate) fn finalize(self) -> MagResult<CalibrationResult> {
        if self.samples == 0 {
            return Err(MagError::EmptyCalibration);
        }

        let mid = (self.min + self.max) / 2.0;
        let varymax = self.max - mid;
        let varymin = self.min - mid;

        // Demi-amplitude crête à crête par axe
        let avg = (varymax - varymin) / 2.0;

        for (i, axe) in ['x', 'y', 'z'].into_iter().enumerate() {
            if avg[i] == 0.0 {
                return Err(MagError::DegenerateCalibration(axe));
            }
        }

        let avgrad = (avg.x + avg.y + avg.z) / 3.0;

        Ok(CalibrationResult {
            offset: mid,
            scale: Vector3::new(avgrad / avg.x, avgrad / avg.y, avgrad / avg.z),
        })
    }
}
