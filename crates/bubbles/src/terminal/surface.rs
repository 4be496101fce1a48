//! Turn a rendered raster into terminal cells made of half-block "pixels".

use termwiz::surface::Change as TermwizChange;
use termwiz::surface::Position as TermwizPosition;

use super::raster::RasterCanvas;

/// An RGBA colour, as termwiz likes them.
pub type CellColour = (f32, f32, f32, f32);

/// Pixels more transparent than this are left as the terminal's default background.
const MINIMUM_VISIBLE_ALPHA: f32 = 1.0 / 255.0;

/// `Surface`
pub struct Surface {
    /// The terminal's width
    pub width: usize,
    /// The terminal's height
    pub height: usize,
    /// A surface of terminal cells
    pub surface: termwiz::surface::Surface,
}

impl Surface {
    /// Instantiate an empty surface.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            surface: termwiz::surface::Surface::new(width, height),
        }
    }

    /// Shrink a raster down to the terminal's resolution of `width × height * 2` pixels.
    ///
    /// Every terminal pixel is the average of the block of raster pixels under it, composited
    /// over the terminal's background, which we assume is black.
    pub fn from_raster(raster: &RasterCanvas, width: usize, height: usize) -> Self {
        let mut surface = Self::new(width, height);
        let (raster_width, raster_height) = raster.backing_size();
        let pixel_rows = height * 2;

        for row in 0..height {
            for col in 0..width {
                let (left, right) = Self::block(col, width, raster_width);
                let (upper_top, upper_bottom) = Self::block(row * 2, pixel_rows, raster_height);
                let (lower_top, lower_bottom) =
                    Self::block(row * 2 + 1, pixel_rows, raster_height);

                let upper = Self::visible(raster.average(left, upper_top, right, upper_bottom));
                let lower = Self::visible(raster.average(left, lower_top, right, lower_bottom));
                surface.add_cell_pixels(col, row, upper, lower);
            }
        }

        surface
    }

    /// The range of raster pixels that sit under the `index`th of `count` terminal pixels.
    fn block(index: usize, count: usize, raster_size: usize) -> (usize, usize) {
        if count == 0 {
            return (0, 0);
        }
        (
            index * raster_size / count,
            (index + 1) * raster_size / count,
        )
    }

    /// Convert an averaged premultiplied pixel to an opaque colour over black, if it shows at all.
    fn visible(pixel: super::raster::Pixel) -> Option<CellColour> {
        let [red, green, blue, alpha] = pixel;
        if alpha < MINIMUM_VISIBLE_ALPHA {
            return None;
        }
        Some((red.min(1.0), green.min(1.0), blue.min(1.0), 1.0))
    }

    /// Write the two pixels of a single cell.
    ///
    /// The rule is that a pair of colours is rendered with the upper half block: the upper "pixel"
    /// is the cell's foreground and the lower "pixel" is its background. A lone lower pixel is the
    /// exception, it uses the lower half block so that the cell's upper half can keep the
    /// terminal's default background.
    pub fn add_cell_pixels(
        &mut self,
        col: usize,
        row: usize,
        upper: Option<CellColour>,
        lower: Option<CellColour>,
    ) {
        let (character, foreground, background) = match (upper, lower) {
            (None, None) => return,
            (Some(upper_colour), None) => (
                "▀",
                Self::make_fg_colour(upper_colour),
                Self::make_default_bg_colour(),
            ),
            (None, Some(lower_colour)) => (
                "▄",
                Self::make_fg_colour(lower_colour),
                Self::make_default_bg_colour(),
            ),
            (Some(upper_colour), Some(lower_colour)) => (
                "▀",
                Self::make_fg_colour(upper_colour),
                Self::make_bg_colour(lower_colour),
            ),
        };

        self.surface.add_changes(vec![
            TermwizChange::CursorPosition {
                x: TermwizPosition::Absolute(col),
                y: TermwizPosition::Absolute(row),
            },
            foreground,
            background,
        ]);
        self.surface.add_change(character);
    }

    /// Make a Termwiz colour attribute
    #[must_use]
    pub const fn make_colour_attribute(colour: CellColour) -> termwiz::color::ColorAttribute {
        termwiz::color::ColorAttribute::TrueColorWithDefaultFallback(termwiz::color::SrgbaTuple(
            colour.0, colour.1, colour.2, colour.3,
        ))
    }

    /// Make a Termwiz background colour
    #[must_use]
    pub const fn make_bg_colour(colour: CellColour) -> TermwizChange {
        let colour_attribute = Self::make_colour_attribute(colour);
        TermwizChange::Attribute(termwiz::cell::AttributeChange::Background(colour_attribute))
    }

    /// Make the default Termwiz background colour. This is the non-colour, usually black, that a
    /// terminal displays when nothing else has been set. It's often what's used on a GUI terminal
    /// to make it's background transparent.
    #[must_use]
    pub const fn make_default_bg_colour() -> TermwizChange {
        let colour_attribute = termwiz::color::ColorAttribute::Default;
        TermwizChange::Attribute(termwiz::cell::AttributeChange::Background(colour_attribute))
    }

    /// Make a Termwiz foreground colour
    #[must_use]
    pub const fn make_fg_colour(colour: CellColour) -> TermwizChange {
        let colour_attribute = Self::make_colour_attribute(colour);
        TermwizChange::Attribute(termwiz::cell::AttributeChange::Foreground(colour_attribute))
    }
}

#[cfg(test)]
#[expect(
    clippy::indexing_slicing,
    clippy::shadow_unrelated,
    reason = "Tests aren't so strict"
)]
mod test {
    use super::*;
    use crate::canvas::{Canvas as _, SurfaceManager};
    use crate::config::preset::Colour;

    const WHITE: CellColour = (1.0, 1.0, 1.0, 1.0);
    const RED: CellColour = (1.0, 0.0, 0.0, 1.0);

    /// A 2x1 terminal where every half-block pixel is 4x4 logical pixels.
    fn raster() -> SurfaceManager<RasterCanvas> {
        SurfaceManager::new(RasterCanvas::new((8.0, 8.0), 1.0))
    }

    #[test]
    fn upper_pixel_only() {
        let mut surface = Surface::new(1, 1);
        surface.add_cell_pixels(0, 0, Some(WHITE), None);
        let cell = &surface.surface.screen_cells()[0][0];
        assert_eq!(cell.str(), "▀");
        assert_eq!(
            cell.attrs().foreground(),
            Surface::make_colour_attribute(WHITE)
        );
        assert_eq!(
            cell.attrs().background(),
            termwiz::color::ColorAttribute::Default
        );
    }

    #[test]
    fn lower_pixel_only() {
        let mut surface = Surface::new(1, 1);
        surface.add_cell_pixels(0, 0, None, Some(RED));
        let cell = &surface.surface.screen_cells()[0][0];
        assert_eq!(cell.str(), "▄");
        assert_eq!(
            cell.attrs().foreground(),
            Surface::make_colour_attribute(RED)
        );
        assert_eq!(
            cell.attrs().background(),
            termwiz::color::ColorAttribute::Default
        );
    }

    #[test]
    fn pair_of_pixels() {
        let mut surface = Surface::new(2, 1);
        surface.add_cell_pixels(1, 0, Some(RED), Some(WHITE));
        let cells = surface.surface.screen_cells();
        assert_eq!(cells[0][0].str(), " ");
        assert_eq!(cells[0][1].str(), "▀");
        assert_eq!(
            cells[0][1].attrs().foreground(),
            Surface::make_colour_attribute(RED)
        );
        assert_eq!(
            cells[0][1].attrs().background(),
            Surface::make_colour_attribute(WHITE)
        );
    }

    #[test]
    fn default_background_is_restored_after_a_pair() {
        let mut surface = Surface::new(2, 1);
        surface.add_cell_pixels(0, 0, Some(RED), Some(WHITE));
        surface.add_cell_pixels(1, 0, Some(RED), None);
        let cells = surface.surface.screen_cells();
        assert_eq!(
            cells[0][1].attrs().background(),
            termwiz::color::ColorAttribute::Default
        );
    }

    #[test]
    fn raster_is_downsampled_into_half_blocks() {
        let mut raster = raster();
        let white = Colour::new(1.0, 1.0, 1.0, 1.0);
        // Fills only the upper-left 4x4 block.
        raster.canvas_mut().fill_circle(2.0, 2.0, 1.5, white);
        // Fills the whole right-hand column of blocks.
        raster.canvas_mut().fill_circle(6.0, 4.0, 20.0, white);
        raster.canvas_mut().clear(0.0, 4.0, 4.0, 4.0);

        let mut surface = Surface::from_raster(raster.canvas(), 2, 1);
        let cells = surface.surface.screen_cells();

        assert_eq!(cells[0][0].str(), "▀");
        assert_eq!(
            cells[0][0].attrs().background(),
            termwiz::color::ColorAttribute::Default
        );

        assert_eq!(cells[0][1].str(), "▀");
        assert_eq!(
            cells[0][1].attrs().foreground(),
            Surface::make_colour_attribute(WHITE)
        );
        assert_eq!(
            cells[0][1].attrs().background(),
            Surface::make_colour_attribute(WHITE)
        );
    }

    #[test]
    fn empty_raster_is_blank() {
        let raster = raster();
        let mut surface = Surface::from_raster(raster.canvas(), 2, 1);
        let cells = surface.surface.screen_cells();
        assert_eq!(cells[0][0].str(), " ");
        assert_eq!(cells[0][1].str(), " ");
    }
}
