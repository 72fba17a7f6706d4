#![allow(unused)]

// HMC5883L
pub const HMC5883L_MAG_ADDR: u16 = 0x1E;

pub const HMC5883L_CONF_A: u8 = 0x00;
pub const HMC5883L_CONF_B: u8 = 0x01;
pub const HMC5883L_MODE: u8 = 0x02;

// Bloc de données, lu d'un seul coup à partir de 0x00.
// L'ordre des axes sur le fil est X, Z, Y.
pub const HMC5883L_BLOC: u8 = 0x00;
pub const HMC5883L_BLOC_LEN: usize = 32;
pub const HMC5883L_X_OFFSET: usize = 3;
pub const HMC5883L_Z_OFFSET: usize = 5;
pub const HMC5883L_Y_OFFSET: usize = 7;

// Valeur sentinelle renvoyée quand le convertisseur du capteur sature
pub const HMC5883L_OVERFLOW: i32 = -4096;

// Table des sensibilités: gauss -> (valeur du registre de gain, échelle)
pub const HMC5883L_GAUSS_SCALES: [(f32, u8, f32); 8] = [
    (0.88, 0, 0.73),
    (1.30, 1, 0.92),
    (1.90, 2, 1.22),
    (2.50, 3, 1.52),
    (4.00, 4, 2.27),
    (4.70, 5, 2.56),
    (5.60, 6, 3.03),
    (8.10, 7, 4.35),
];
