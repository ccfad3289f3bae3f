//! OBD-II bus protocol selection

use serde::{Deserialize, Serialize};

/// Bus protocol the adapter should use, `Auto` lets the ELM327 search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObdProtocol {
    #[default]
    Auto,
    /// SAE J1850 PWM
    J1850Pwm,
    /// SAE J1850 VPW
    J1850Vpw,
    /// ISO 9141-2
    Iso9141,
    /// ISO 14230-4 KWP, 5 baud init
    Kwp2000Slow,
    /// ISO 14230-4 KWP, fast init
    Kwp2000Fast,
    /// ISO 15765-4 CAN, 11 bit ID, 500 kbaud
    Can11bit500,
    /// ISO 15765-4 CAN, 29 bit ID, 500 kbaud
    Can29bit500,
    /// ISO 15765-4 CAN, 11 bit ID, 250 kbaud
    Can11bit250,
    /// ISO 15765-4 CAN, 29 bit ID, 250 kbaud
    Can29bit250,
}

impl ObdProtocol {
    /// ELM327 "set protocol" command
    pub fn to_elm_command(&self) -> String {
        format!("ATSP{}", self.elm_number())
    }

    fn elm_number(&self) -> u8 {
        match self {
            ObdProtocol::Auto => 0,
            ObdProtocol::J1850Pwm => 1,
            ObdProtocol::J1850Vpw => 2,
            ObdProtocol::Iso9141 => 3,
            ObdProtocol::Kwp2000Slow => 4,
            ObdProtocol::Kwp2000Fast => 5,
            ObdProtocol::Can11bit500 => 6,
            ObdProtocol::Can29bit500 => 7,
            ObdProtocol::Can11bit250 => 8,
            ObdProtocol::Can29bit250 => 9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elm_commands() {
        assert_eq!(ObdProtocol::default().to_elm_command(), "ATSP0");
        assert_eq!(ObdProtocol::Can11bit500.to_elm_command(), "ATSP6");
    }
}
