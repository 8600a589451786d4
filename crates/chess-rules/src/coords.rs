//! Mapping between screen pixels and board squares.
//!
//! The board is drawn with rank 8 at the top of the screen, so the
//! vertical axis is flipped relative to rank order.

use chess_core::Square;
use serde::{Deserialize, Serialize};

/// A position in screen pixels, y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPos {
    pub x: f32,
    pub y: f32,
}

impl PixelPos {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        PixelPos { x, y }
    }

    #[inline]
    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f32, f32)> for PixelPos {
    fn from((x, y): (f32, f32)) -> Self {
        PixelPos { x, y }
    }
}

/// Resolves a pixel to the square drawn under it.
///
/// `board_origin` is the top-left corner of the a8 square. Returns `None`
/// when the pixel is outside the drawn board or the geometry is degenerate.
pub fn to_square(
    pixel: PixelPos,
    board_origin: PixelPos,
    square_width: f32,
    square_height: f32,
) -> Option<Square> {
    if !pixel.is_finite() || !board_origin.is_finite() {
        return None;
    }
    if !(square_width.is_finite() && square_height.is_finite())
        || square_width <= 0.0
        || square_height <= 0.0
    {
        return None;
    }

    let dx = pixel.x - board_origin.x;
    let dy = pixel.y - board_origin.y;
    if dx < 0.0 || dy < 0.0 {
        return None;
    }

    let column = (dx / square_width).floor();
    let row = (dy / square_height).floor();
    if column >= 8.0 || row >= 8.0 {
        return None;
    }

    Square::new(column as u8, 7 - row as u8)
}

/// Where and how large the board is drawn on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardLayout {
    pub origin_x: f32,
    pub origin_y: f32,
    pub square_width: f32,
    pub square_height: f32,
}

impl BoardLayout {
    /// Screen size the default layout is centred in.
    pub const DEFAULT_SCREEN: (f32, f32) = (1200.0, 720.0);

    /// A board of `square_width` × `square_height` squares centred on a
    /// `screen_width` × `screen_height` screen.
    pub fn centered(
        screen_width: f32,
        screen_height: f32,
        square_width: f32,
        square_height: f32,
    ) -> Self {
        BoardLayout {
            origin_x: screen_width / 2.0 - square_width * 4.0,
            origin_y: screen_height / 2.0 - square_height * 4.0,
            square_width,
            square_height,
        }
    }

    /// Returns true if square sizes are positive and every field is finite.
    pub fn is_valid(&self) -> bool {
        [
            self.origin_x,
            self.origin_y,
            self.square_width,
            self.square_height,
        ]
        .iter()
        .all(|v| v.is_finite())
            && self.square_width > 0.0
            && self.square_height > 0.0
    }

    #[inline]
    pub fn origin(&self) -> PixelPos {
        PixelPos::new(self.origin_x, self.origin_y)
    }

    /// Total drawn width and height of the board.
    #[inline]
    pub fn size(&self) -> (f32, f32) {
        (self.square_width * 8.0, self.square_height * 8.0)
    }

    /// Resolves a pixel to the square under it, see [`to_square`].
    #[inline]
    pub fn to_square(&self, pixel: PixelPos) -> Option<Square> {
        to_square(pixel, self.origin(), self.square_width, self.square_height)
    }

    /// Top-left pixel of `square`.
    pub fn square_origin(&self, square: Square) -> PixelPos {
        PixelPos::new(
            self.origin_x + square.file() as f32 * self.square_width,
            self.origin_y + (7 - square.rank()) as f32 * self.square_height,
        )
    }

    /// Centre pixel of `square`.
    pub fn square_center(&self, square: Square) -> PixelPos {
        let corner = self.square_origin(square);
        PixelPos::new(
            corner.x + self.square_width / 2.0,
            corner.y + self.square_height / 2.0,
        )
    }
}

impl Default for BoardLayout {
    /// 75×72 squares centred on a 1200×720 screen.
    fn default() -> Self {
        let (width, height) = Self::DEFAULT_SCREEN;
        BoardLayout::centered(width, height, width / 2.0 / 8.0, height / 1.25 / 8.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn default_layout_is_centred() {
        let layout = BoardLayout::default();
        assert_eq!(layout.square_width, 75.0);
        assert_eq!(layout.square_height, 72.0);
        assert_eq!(layout.origin(), PixelPos::new(300.0, 72.0));
        assert_eq!(layout.size(), (600.0, 576.0));
        assert!(layout.is_valid());
    }

    #[test]
    fn top_left_is_a8_and_bottom_left_is_a1() {
        let origin = PixelPos::new(100.0, 50.0);
        assert_eq!(
            to_square(PixelPos::new(100.0, 50.0), origin, 10.0, 10.0),
            Some(Square::A8)
        );
        assert_eq!(
            to_square(PixelPos::new(105.0, 129.9), origin, 10.0, 10.0),
            Some(Square::A1)
        );
        assert_eq!(
            to_square(PixelPos::new(179.0, 129.0), origin, 10.0, 10.0),
            Some(Square::H1)
        );
        assert_eq!(
            to_square(PixelPos::new(145.0, 85.0), origin, 10.0, 10.0),
            Some(sq("e5"))
        );
    }

    #[test]
    fn outside_the_board_is_none() {
        let origin = PixelPos::new(100.0, 50.0);
        for pixel in [
            PixelPos::new(99.9, 60.0),
            PixelPos::new(120.0, 49.0),
            PixelPos::new(180.0, 60.0),
            PixelPos::new(120.0, 130.0),
            PixelPos::new(f32::NAN, 60.0),
            PixelPos::new(120.0, f32::INFINITY),
        ] {
            assert_eq!(to_square(pixel, origin, 10.0, 10.0), None, "{:?}", pixel);
        }
    }

    #[test]
    fn degenerate_geometry_is_none() {
        let origin = PixelPos::new(0.0, 0.0);
        let pixel = PixelPos::new(1.0, 1.0);
        assert_eq!(to_square(pixel, origin, 0.0, 10.0), None);
        assert_eq!(to_square(pixel, origin, 10.0, -1.0), None);
        assert_eq!(to_square(pixel, origin, f32::NAN, 10.0), None);
        assert!(!BoardLayout {
            square_width: 0.0,
            ..BoardLayout::default()
        }
        .is_valid());
    }

    #[test]
    fn square_origin_places_rank_eight_on_top() {
        let layout = BoardLayout::centered(800.0, 800.0, 50.0, 50.0);
        assert_eq!(layout.square_origin(Square::A8), PixelPos::new(200.0, 200.0));
        assert_eq!(layout.square_origin(Square::A1), PixelPos::new(200.0, 550.0));
        assert_eq!(layout.square_center(Square::H1), PixelPos::new(575.0, 575.0));
    }

    proptest! {
        #[test]
        fn every_point_inside_a_square_maps_back_to_it(
            index in 0u8..64,
            fx in 0.0f32..0.99,
            fy in 0.0f32..0.99,
        ) {
            let layout = BoardLayout::default();
            let square = Square::from_index(index).unwrap();
            let corner = layout.square_origin(square);
            let pixel = PixelPos::new(
                corner.x + fx * layout.square_width,
                corner.y + fy * layout.square_height,
            );
            prop_assert_eq!(layout.to_square(pixel), Some(square));
        }

        #[test]
        fn any_resolved_square_contains_the_pixel(x in -100.0f32..1300.0, y in -100.0f32..800.0) {
            let layout = BoardLayout::default();
            if let Some(square) = layout.to_square(PixelPos::new(x, y)) {
                let corner = layout.square_origin(square);
                let eps = 1e-3;
                prop_assert!(x >= corner.x - eps && x < corner.x + layout.square_width + eps);
                prop_assert!(y >= corner.y - eps && y < corner.y + layout.square_height + eps);
            }
        }
    }
}
