use clap::Parser;

#[derive(Debug, Parser, Clone)]
pub struct Cli {
    /// Bus I2C du Raspberry Pi
    #[arg(long, default_value_t = 1)]
    pub bus: u8,

    /// Adresse du capteur sur le bus
    #[arg(long, default_value_t = 0x1E)]
    pub address: u16,

    /// Sensibilité pleine échelle (gauss), voir la table du HMC5883L
    #[arg(long, default_value_t = 1.3)]
    pub gauss: f32,

    /// Déclinaison magnétique (degrés)
    #[arg(long, default_value_t = 0.0)]
    pub declination_degrees: f32,

    /// Déclinaison magnétique (minutes)
    #[arg(long, default_value_t = 0.0)]
    pub declination_minutes: f32,

    /// Nombre de lectures moyennées par calcul de heading
    #[arg(long, default_value_t = 500)]
    pub samples: u32,

    /// Nombre d'échantillons de la session de calibration
    #[arg(long, default_value_t = 1000)]
    pub calibration_samples: u32,

    /// Lance une session de calibration au démarrage
    #[arg(long)]
    pub calibrate: bool,
}
