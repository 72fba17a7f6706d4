use thiserror::Error;

pub(crate) type MagResult<T> = Result<T, MagError>;

/// Erreurs du capteur magnétique et de sa calibration.
#[derive(Error, Debug)]
pub(crate) enum MagError {
    #[error("Erreur de bus I2C: {0}")]
    Bus(anyhow::Error),
    #[error("Saturation du capteur (valeur sentinelle -4096)")]
    Overflow,
    #[error("Sensibilité gauss inconnue: {0}")]
    InvalidGauss(f32),
    #[error("Calibration dégénérée: aucune variation sur l'axe {0}")]
    DegenerateCalibration(char),
    #[error("Calibration terminée sans aucun échantillon")]
    EmptyCalibration,
    #[error("Aucune lecture valide sur {0} tentatives")]
    NoSignal(u32),
}
