use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::sensors::mag::registry;

#[derive(Serialize, Deserialize, Clone)]
pub struct Config {
    pub(crate) bus: u8,
    pub(crate) address: u16,
    pub(crate) gauss: f32,
    pub(crate) declination: (f32, f32),
    pub(crate) heading_samples: u32,
    pub(crate) calibration_samples: u32,
    pub(crate) calibrate: bool,
}

impl Config {
    pub fn new() -> Self {
        Config {
            bus: 1,
            address: registry::HMC5883L_MAG_ADDR,
            gauss: 1.3,
            declination: (0.0, 0.0),
            heading_samples: 500,
            calibration_samples: 1000,
            calibrate: false,
        }
    }

    pub fn from_cli(cli: &Cli) -> Self {
        Config {
            bus: cli.bus,
            address: cli.address,
            gauss: cli.gauss,
            declination: (cli.declination_degrees, cli.declination_minutes),
            heading_samples: cli.samples,
            calibration_samples: cli.calibration_samples,
            calibrate: cli.calibrate,
        }
    }
}
