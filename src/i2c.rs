use crate::sensors::mag::{MagError, MagResult};

/// Primitives I2C consommées par le capteur magnétique.
pub trait I2CBit {
    fn ecriture_word(&mut self, command: u8, data: u8) -> MagResult<()>;
    fn lecture_bloc(&mut self, command: u8, buffer: &mut [u8]) -> MagResult<()>;
}

#[cfg(feature = "real-sensors")]
impl I2CBit for rppal::i2c::I2c {
    /// Ecrit un octet (word) sur la position donnée d'un registre 8 bits
    fn ecriture_word(&mut self, command: u8, data: u8) -> MagResult<()> {
        self.block_write(command, &[data])
            .map_err(|e| MagError::Bus(e.into()))
    }

    /// Lecture d'un bloc d'octets à partir de la position donnée
    fn lecture_bloc(&mut self, command: u8, buffer: &mut [u8]) -> MagResult<()> {
        self.block_read(command, buffer)
            .map_err(|e| MagError::Bus(e.into()))
    }
}
