//! Command and parameter integers of the MVT geometry grammar.
//!
//! See <https://github.com/mapbox/vector-tile-spec/tree/master/2.1#43-geometry-encoding>

use crate::{MvtError, MvtResult};

/// Largest repeat count that fits into the 29 upper bits of a command integer.
pub const MAX_COMMAND_COUNT: u32 = 0x1FFF_FFFF;

/// Drawing commands of the MVT geometry grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveTo = 1,
    LineTo = 2,
    ClosePath = 7,
}

/// Command to be executed and the number of times that the command will be executed
/// <https://github.com/mapbox/vector-tile-spec/tree/master/2.1#431-command-integers>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandInteger(pub u32);

impl CommandInteger {
    /// Packs a command id with its repeat count.
    pub fn encode(id: Command, count: usize) -> MvtResult<u32> {
        let count = u32::try_from(count)
            .ok()
            .filter(|c| *c <= MAX_COMMAND_COUNT)
            .ok_or(MvtError::CommandCountOverflow(count))?;
        Ok(((id as u32) & 0x7) | (count << 3))
    }

    #[must_use]
    pub fn id(self) -> u32 {
        self.0 & 0x7
    }

    #[must_use]
    pub fn count(self) -> u32 {
        self.0 >> 3
    }
}

/// Commands requiring parameters are followed by a `ParameterInteger` for each parameter required by that command
/// <https://github.com/mapbox/vector-tile-spec/tree/master/2.1#432-parameter-integers>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterInteger(pub u32);

impl ParameterInteger {
    /// Zigzag-encodes a signed delta.
    #[must_use]
    #[expect(clippy::cast_sign_loss, reason = "zigzag output is reinterpreted as unsigned")]
    pub fn encode(value: i32) -> u32 {
        ((value << 1) ^ (value >> 31)) as u32
    }

    #[must_use]
    #[expect(clippy::cast_possible_wrap, reason = "both operands fit into 31 bits")]
    pub fn value(self) -> i32 {
        ((self.0 >> 1) as i32) ^ (-((self.0 & 1) as i32))
    }
}
