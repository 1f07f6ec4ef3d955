use geo_types::Coord;

use crate::commands::{Command, CommandInteger, ParameterInteger};
use crate::{Extent, MvtResult};

/// Running tile-local position used to compute coordinate deltas.
///
/// `(0, 0)` is the top-left corner of the tile. A cursor lives for exactly one
/// encoded geometry and is carried across all of its lines, rings and polygons.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub x: f64,
    pub y: f64,
}

impl Cursor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a `MoveTo` command for all `points`, appending it to `out`.
    pub fn move_to<I>(&mut self, extent: &Extent, points: I, out: &mut Vec<u32>) -> MvtResult<()>
    where
        I: IntoIterator<Item = Coord>,
        I::IntoIter: ExactSizeIterator,
    {
        self.draw(Command::MoveTo, extent, points.into_iter(), out)
    }

    /// Emits a `LineTo` command for all `points`, appending it to `out`.
    pub fn line_to<I>(&mut self, extent: &Extent, points: I, out: &mut Vec<u32>) -> MvtResult<()>
    where
        I: IntoIterator<Item = Coord>,
        I::IntoIter: ExactSizeIterator,
    {
        self.draw(Command::LineTo, extent, points.into_iter(), out)
    }

    /// `ClosePath` never moves the cursor and always has a count of one.
    #[must_use]
    pub fn close_path(&self) -> u32 {
        (Command::ClosePath as u32 & 0x7) | (1 << 3)
    }

    fn draw(
        &mut self,
        cmd: Command,
        extent: &Extent,
        points: impl ExactSizeIterator<Item = Coord>,
        out: &mut Vec<u32>,
    ) -> MvtResult<()> {
        let count = points.len();
        if count == 0 {
            return Ok(());
        }
        out.reserve(2 * count + 1);
        out.push(CommandInteger::encode(cmd, count)?);
        for point in points {
            let (x, y) = extent.normalize(point.x, point.y);
            out.push(ParameterInteger::encode(delta(x, self.x)));
            out.push(ParameterInteger::encode(delta(y, self.y)));
            self.x = x;
            self.y = y;
        }
        Ok(())
    }
}

/// Truncates toward zero, saturating at the `i32` bounds.
#[expect(
    clippy::cast_possible_truncation,
    reason = "deltas are whole grid units"
)]
fn delta(to: f64, from: f64) -> i32 {
    (to - from) as i32
}
