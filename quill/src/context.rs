// Copyright 2026 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::ops::RangeBounds;

use peniko::Color;
use quill_geometry::{AffineTransform, Point, Rect, Size};
use smallvec::SmallVec;

use crate::{
    DisplayList, DrawCommand, Error, FillRule, PaintState, Path, PathDrawingMode, PathElement,
    PathSink, StrokeStyle, TextRun,
};

/// Options which are set at context creation time, used in [`Context::new`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContextOptions {
    /// The initial user space to device space transform.
    ///
    /// Use this for a flipped coordinate system or a backing scale factor.
    pub device_transform: AffineTransform,
    /// The initial clip, in device space.
    pub bounds: Rect,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            device_transform: AffineTransform::IDENTITY,
            bounds: Rect::INFINITE,
        }
    }
}

impl ContextOptions {
    pub fn with_device_transform(mut self, transform: AffineTransform) -> Self {
        self.device_transform = transform;
        self
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    SoftLight,
    HardLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
    Clear,
    Copy,
    SourceIn,
    SourceOut,
    SourceAtop,
    DestinationOver,
    DestinationIn,
    DestinationOut,
    DestinationAtop,
    Xor,
    PlusDarker,
    PlusLighter,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextDrawingMode {
    #[default]
    Fill,
    Stroke,
    FillStroke,
    Invisible,
    FillClip,
    StrokeClip,
    FillStrokeClip,
    Clip,
}

/// A dash pattern: alternating painted and unpainted lengths, starting `phase` into
/// the pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct Dash {
    phase: f64,
    lengths: SmallVec<[f64; 4]>,
}

impl Dash {
    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }
}

/// The parameters saved and restored by [`Context::save_state`] and
/// [`Context::restore_state`].
///
/// The current path is not part of the graphics state.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphicsState {
    /// Current transformation matrix, from user space to device space.
    pub ctm: AffineTransform,
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f64,
    pub line_dash: Option<Dash>,
    pub fill_color: Color,
    pub stroke_color: Color,
    pub flatness: f64,
    pub alpha: f64,
    pub blend_mode: BlendMode,
    pub should_antialias: bool,
    /// Clip rectangle in device space.
    ///
    /// Path clips are tracked by their bounding box.
    pub clip: Rect,
    pub text_matrix: AffineTransform,
    pub text_position: Point,
    pub character_spacing: f64,
    pub font_size: f64,
    pub text_drawing_mode: TextDrawingMode,
}

impl GraphicsState {
    fn new(options: &ContextOptions) -> Self {
        Self {
            ctm: options.device_transform,
            line_width: 1.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            miter_limit: 10.0,
            line_dash: None,
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
            flatness: 0.5,
            alpha: 1.0,
            blend_mode: BlendMode::default(),
            should_antialias: true,
            clip: options.bounds,
            text_matrix: AffineTransform::IDENTITY,
            text_position: Point::ZERO,
            character_spacing: 0.0,
            font_size: 12.0,
            text_drawing_mode: TextDrawingMode::default(),
        }
    }
}

/// A drawing context that records what is drawn.
///
/// The context keeps a stack of [graphics states](GraphicsState) and a current path.
/// Path construction goes through [`PathSink`]: points are given in user space and
/// stored in device space using the CTM in effect when they are appended. Painting
/// operations consume the current path and append a [`DrawCommand`] to the
/// [`DisplayList`], which a backend can then render.
#[derive(Clone, Debug)]
pub struct Context {
    options: ContextOptions,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
    path: Path,
    display_list: DisplayList,
}
static_assertions::assert_impl_all!(Context: Send, Sync);

impl Default for Context {
    fn default() -> Self {
        Self::new(ContextOptions::default())
    }
}

impl Context {
    pub fn new(options: ContextOptions) -> Self {
        Self {
            state: GraphicsState::new(&options),
            options,
            saved: Vec::new(),
            path: Path::new(),
            display_list: DisplayList::new(),
        }
    }

    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    pub fn state(&self) -> &GraphicsState {
        &self.state
    }

    /// Number of saved graphics states.
    pub fn state_depth(&self) -> usize {
        self.saved.len()
    }

    pub fn save_state(&mut self) {
        self.saved.push(self.state.clone());
    }

    /// Restores the most recently saved graphics state.
    ///
    /// Without a matching [`save_state`](Self::save_state) this has no effect.
    pub fn restore_state(&mut self) {
        match self.saved.pop() {
            Some(state) => self.state = state,
            None => log::warn!("restore_state called without a matching save_state"),
        }
    }

    // Transformations

    pub fn scale_ctm(&mut self, sx: f64, sy: f64) {
        self.concat_ctm(AffineTransform::scale(sx, sy));
    }

    pub fn translate_ctm(&mut self, tx: f64, ty: f64) {
        self.concat_ctm(AffineTransform::translation(tx, ty));
    }

    pub fn rotate_ctm(&mut self, angle: f64) {
        self.concat_ctm(AffineTransform::rotation(angle));
    }

    /// Prepends `transform` to the CTM: user space points go through `transform`
    /// first and then through the previous CTM.
    pub fn concat_ctm(&mut self, transform: AffineTransform) {
        self.state.ctm = transform.then(self.state.ctm);
    }

    /// The current transformation matrix, including the device transform.
    pub fn ctm(&self) -> AffineTransform {
        self.state.ctm
    }

    pub fn user_space_to_device_space_transform(&self) -> AffineTransform {
        self.state.ctm
    }

    fn device_to_user(&self) -> Result<AffineTransform, Error> {
        Ok(self.state.ctm.invert()?)
    }

    pub fn convert_point_to_device_space(&self, point: Point) -> Point {
        self.state.ctm.transform_point(point)
    }

    pub fn convert_point_to_user_space(&self, point: Point) -> Result<Point, Error> {
        Ok(self.device_to_user()?.transform_point(point))
    }

    pub fn convert_size_to_device_space(&self, size: Size) -> Size {
        self.state.ctm.transform_size(size)
    }

    pub fn convert_size_to_user_space(&self, size: Size) -> Result<Size, Error> {
        Ok(self.device_to_user()?.transform_size(size))
    }

    pub fn convert_rect_to_device_space(&self, rect: Rect) -> Rect {
        self.state.ctm.transform_rect(rect)
    }

    pub fn convert_rect_to_user_space(&self, rect: Rect) -> Result<Rect, Error> {
        Ok(self.device_to_user()?.transform_rect(rect))
    }

    // Graphics state parameters

    /// Sets the stroke width in user space. Negative and NaN widths are rejected.
    pub fn set_line_width(&mut self, width: f64) -> Result<(), Error> {
        self.state.line_width = check_line_width(width)?;
        Ok(())
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    pub fn set_miter_limit(&mut self, limit: f64) {
        self.state.miter_limit = limit;
    }

    /// Sets the dash pattern. An empty `lengths` slice turns dashing off.
    ///
    /// Lengths must be finite and non-negative, and not all zero.
    pub fn set_line_dash(&mut self, phase: f64, lengths: &[f64]) -> Result<(), Error> {
        if lengths.is_empty() {
            self.state.line_dash = None;
            return Ok(());
        }
        if lengths.iter().any(|l| !l.is_finite() || *l < 0.0) {
            return Err(Error::invalid("lengths", "must be finite and non-negative"));
        }
        if lengths.iter().all(|l| *l == 0.0) {
            return Err(Error::invalid("lengths", "must not all be zero"));
        }
        self.state.line_dash = Some(Dash {
            phase,
            lengths: SmallVec::from_slice(lengths),
        });
        Ok(())
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.state.fill_color = color;
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.state.stroke_color = color;
    }

    /// Sets the fill color to a gray level. Components are clamped to `[0, 1]`.
    pub fn set_gray_fill_color(&mut self, gray: f64, alpha: f64) {
        self.state.fill_color = Color::rgba(gray, gray, gray, alpha);
    }

    /// Sets the stroke color to a gray level. Components are clamped to `[0, 1]`.
    pub fn set_gray_stroke_color(&mut self, gray: f64, alpha: f64) {
        self.state.stroke_color = Color::rgba(gray, gray, gray, alpha);
    }

    pub fn set_flatness(&mut self, flatness: f64) {
        self.state.flatness = flatness;
    }

    /// Sets the global alpha, clamped to `[0, 1]`.
    pub fn set_alpha(&mut self, alpha: f64) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.state.blend_mode = mode;
    }

    pub fn set_should_antialias(&mut self, antialias: bool) {
        self.state.should_antialias = antialias;
    }

    pub fn set_text_matrix(&mut self, matrix: AffineTransform) {
        self.state.text_matrix = matrix;
    }

    pub fn text_matrix(&self) -> AffineTransform {
        self.state.text_matrix
    }

    pub fn set_text_position(&mut self, position: Point) {
        self.state.text_position = position;
    }

    pub fn text_position(&self) -> Point {
        self.state.text_position
    }

    pub fn set_character_spacing(&mut self, spacing: f64) {
        self.state.character_spacing = spacing;
    }

    pub fn set_font_size(&mut self, size: f64) {
        self.state.font_size = size;
    }

    pub fn set_text_drawing_mode(&mut self, mode: TextDrawingMode) {
        self.state.text_drawing_mode = mode;
    }

    // Current path

    /// Discards the current path.
    pub fn begin_path(&mut self) {
        self.path.clear();
    }

    pub fn is_path_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// The current point of the current path, in user space.
    pub fn path_current_point(&self) -> Result<Option<Point>, Error> {
        match self.path.current_point() {
            Some(p) => Ok(Some(self.device_to_user()?.transform_point(p))),
            None => Ok(None),
        }
    }

    /// A copy of the current path in user space.
    pub fn copy_path(&self) -> Result<Path, Error> {
        Ok(self.path.transformed(&self.device_to_user()?))
    }

    /// Bounding box of the current path in user space, control points included.
    pub fn path_bounding_box(&self) -> Result<Rect, Error> {
        Ok(self.copy_path()?.bounding_box())
    }

    // Clipping

    pub fn clip_to_rect(&mut self, rect: Rect) {
        let device = self.state.ctm.transform_rect(rect);
        self.state.clip = self.state.clip.intersection(device);
    }

    /// Intersects the clip with the union of `rects`.
    pub fn clip_to_rects(&mut self, rects: &[Rect]) {
        let ctm = self.state.ctm;
        let union = rects
            .iter()
            .fold(Rect::NULL, |acc, r| acc.union(ctm.transform_rect(*r)));
        self.state.clip = self.state.clip.intersection(union);
    }

    /// Intersects the clip with the current path using the nonzero rule, then clears
    /// the path.
    pub fn clip(&mut self) {
        self.clip_to_path();
    }

    /// Intersects the clip with the current path using the even-odd rule, then clears
    /// the path.
    pub fn eo_clip(&mut self) {
        self.clip_to_path();
    }

    fn clip_to_path(&mut self) {
        let path = std::mem::take(&mut self.path);
        self.state.clip = self.state.clip.intersection(path.path_bounding_box());
    }

    /// The clip rectangle in user space.
    pub fn clip_bounding_box(&self) -> Result<Rect, Error> {
        Ok(self.device_to_user()?.transform_rect(self.state.clip))
    }

    // Painting

    fn paint_state(&self, color: Color) -> PaintState {
        PaintState {
            color,
            alpha: self.state.alpha,
            blend_mode: self.state.blend_mode,
            clip: self.state.clip,
            antialias: self.state.should_antialias,
            flatness: self.state.flatness,
        }
    }

    fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle {
            width: self.state.line_width,
            cap: self.state.line_cap,
            join: self.state.line_join,
            miter_limit: self.state.miter_limit,
            dash: self.state.line_dash.clone(),
            transform: self.state.ctm,
        }
    }

    /// Paints the current path and clears it.
    pub fn draw_path(&mut self, mode: PathDrawingMode) {
        let mut path = std::mem::take(&mut self.path);
        if path.is_empty() {
            log::warn!("draw_path called with an empty current path");
            return;
        }
        let (fill, stroke) = match mode {
            PathDrawingMode::Fill => (Some(FillRule::NonZero), false),
            PathDrawingMode::EoFill => (Some(FillRule::EvenOdd), false),
            PathDrawingMode::Stroke => (None, true),
            PathDrawingMode::FillStroke => (Some(FillRule::NonZero), true),
            PathDrawingMode::EoFillStroke => (Some(FillRule::EvenOdd), true),
        };
        if let Some(rule) = fill {
            let paint = self.paint_state(self.state.fill_color);
            let path = if stroke {
                path.clone()
            } else {
                std::mem::take(&mut path)
            };
            self.display_list.push(DrawCommand::Fill { path, rule, paint });
            if !stroke {
                return;
            }
        }
        let style = self.stroke_style();
        let paint = self.paint_state(self.state.stroke_color);
        self.display_list.push(DrawCommand::Stroke { path, style, paint });
    }

    pub fn fill_path(&mut self) {
        self.draw_path(PathDrawingMode::Fill);
    }

    pub fn eo_fill_path(&mut self) {
        self.draw_path(PathDrawingMode::EoFill);
    }

    pub fn stroke_path(&mut self) {
        self.draw_path(PathDrawingMode::Stroke);
    }

    /// Fills `rect`. Like every painting operation, this clears the current path.
    pub fn fill_rect(&mut self, rect: Rect) {
        self.fill_rects(std::slice::from_ref(&rect));
    }

    pub fn fill_rects(&mut self, rects: &[Rect]) {
        self.begin_path();
        self.add_rects(rects);
        if !self.path.is_empty() {
            self.fill_path();
        }
    }

    pub fn stroke_rect(&mut self, rect: Rect) {
        self.begin_path();
        self.add_rect(rect);
        if !self.path.is_empty() {
            self.stroke_path();
        }
    }

    /// Strokes `rect` with a one-off line width, leaving the state's width unchanged.
    pub fn stroke_rect_with_width(&mut self, rect: Rect, width: f64) -> Result<(), Error> {
        let width = check_line_width(width)?;
        let saved = std::mem::replace(&mut self.state.line_width, width);
        self.stroke_rect(rect);
        self.state.line_width = saved;
        Ok(())
    }

    /// Clears the area covered by `rect` to transparent.
    pub fn clear_rect(&mut self, rect: Rect) {
        self.begin_path();
        if rect.is_null() {
            return;
        }
        self.display_list.push(DrawCommand::Clear {
            rect: self.state.ctm.transform_rect(rect),
            clip: self.state.clip,
        });
    }

    pub fn fill_ellipse_in_rect(&mut self, rect: Rect) {
        self.begin_path();
        self.add_ellipse_in_rect(rect);
        if !self.path.is_empty() {
            self.fill_path();
        }
    }

    pub fn stroke_ellipse_in_rect(&mut self, rect: Rect) {
        self.begin_path();
        self.add_ellipse_in_rect(rect);
        if !self.path.is_empty() {
            self.stroke_path();
        }
    }

    /// Strokes a line between each consecutive pair of points.
    ///
    /// `points` must hold an even number of points.
    pub fn stroke_line_segments(&mut self, points: &[Point]) -> Result<(), Error> {
        if points.len() % 2 != 0 {
            return Err(Error::invalid("points", "must hold an even number of points"));
        }
        self.begin_path();
        if points.is_empty() {
            return Ok(());
        }
        for pair in points.chunks_exact(2) {
            self.move_to(pair[0]);
            self.line_to(pair[1])?;
        }
        self.stroke_path();
        Ok(())
    }

    // Text

    /// Draws `glyphs` with their origins at `positions` in user space.
    pub fn show_glyphs_at_positions(
        &mut self,
        glyphs: &[u16],
        positions: &[Point],
    ) -> Result<(), Error> {
        if glyphs.len() != positions.len() {
            return Err(Error::invalid("positions", "must hold one position per glyph"));
        }
        self.push_glyphs(glyphs.to_vec(), positions.to_vec(), self.state.text_matrix);
        Ok(())
    }

    /// Draws `glyphs` starting at the text position, advancing it after every glyph.
    pub fn show_glyphs_with_advances(
        &mut self,
        glyphs: &[u16],
        advances: &[Size],
    ) -> Result<(), Error> {
        if glyphs.len() != advances.len() {
            return Err(Error::invalid("advances", "must hold one advance per glyph"));
        }
        let mut pen = self.state.text_position;
        let positions = advances
            .iter()
            .map(|advance| {
                let origin = pen;
                pen = pen + *advance;
                origin
            })
            .collect();
        self.state.text_position = pen;
        self.push_glyphs(glyphs.to_vec(), positions, self.state.text_matrix);
        Ok(())
    }

    /// Draws the glyphs of `run` in `range`, offset by the text position and using the
    /// run's text matrix.
    pub fn draw_run(&mut self, run: &TextRun, range: impl RangeBounds<usize>) -> Result<(), Error> {
        let range = run.resolve(range)?;
        let origin = self.state.text_position;
        let offset = Size::new(origin.x, origin.y);
        let glyphs = run.glyphs(range.clone())?.to_vec();
        let positions = run
            .positions(range)?
            .iter()
            .map(|p| *p + offset)
            .collect();
        self.push_glyphs(glyphs, positions, run.text_matrix());
        Ok(())
    }

    fn push_glyphs(
        &mut self,
        glyphs: Vec<u16>,
        positions: Vec<Point>,
        text_matrix: AffineTransform,
    ) {
        let color = match self.state.text_drawing_mode {
            TextDrawingMode::Invisible | TextDrawingMode::Clip => return,
            TextDrawingMode::Stroke | TextDrawingMode::StrokeClip => self.state.stroke_color,
            _ => self.state.fill_color,
        };
        if glyphs.is_empty() {
            return;
        }
        self.display_list.push(DrawCommand::Glyphs {
            glyphs,
            positions,
            text_matrix,
            transform: self.state.ctm,
            font_size: self.state.font_size,
            character_spacing: self.state.character_spacing,
            paint: self.paint_state(color),
        });
    }

    // Output

    pub fn display_list(&self) -> &DisplayList {
        &self.display_list
    }

    /// Takes the recorded commands, leaving an empty display list behind.
    pub fn take_display_list(&mut self) -> DisplayList {
        std::mem::take(&mut self.display_list)
    }
}

fn check_line_width(width: f64) -> Result<f64, Error> {
    if width >= 0.0 {
        Ok(width)
    } else {
        Err(Error::invalid("width", "must be a non-negative number"))
    }
}

impl PathSink for Context {
    fn sink_transform(&self) -> AffineTransform {
        self.state.ctm
    }

    fn push_element(&mut self, element: PathElement) {
        self.path.push(element);
    }

    fn sink_current_point(&self) -> Option<Point> {
        self.path.current_point()
    }
}
