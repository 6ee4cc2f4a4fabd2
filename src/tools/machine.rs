use egui::Pos2;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::freehand::{eraser_segment, pencil_segment, spray};
use super::shape::draw_shape;
use super::{TextPrompt, ToolConfig, ToolKind};
use crate::error::{SurfaceError, SurfaceResult};
use crate::fill::{FillOutcome, FloodFill};
use crate::glyph::TextAnchor;
use crate::history::Snapshot;
use crate::surface::PixelSurface;

/// Ephemeral state between a press and its release
#[derive(Debug, Clone)]
pub enum StrokeSession {
    /// Freehand path (pencil, eraser, spray)
    Stroking { tool: ToolKind, last: Pos2 },
    /// Shape or line with a live endpoint
    PreviewingShape {
        tool: ToolKind,
        anchor: Pos2,
        current: Pos2,
        /// The buffer as it was before the press, restored before every preview frame
        pre_shape: Snapshot,
    },
}

/// What the owner of the history should do after a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolOutcome {
    /// No session was active; the event was ignored
    Idle,
    /// A session is open; nothing to record yet
    Pending,
    /// The surface holds a finished edit
    Commit,
    /// The edit deliberately changed nothing and must not be recorded
    Unchanged,
}

/// Translates press/move/release into surface operations for the active tool.
///
/// Tool parameters are passed in on every event rather than held here, so
/// the machine only owns the stroke session and the spray RNG.
#[derive(Debug)]
pub struct ToolStateMachine {
    session: Option<StrokeSession>,
    rng: StdRng,
    fill_iteration_factor: f32,
}

impl Default for ToolStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolStateMachine {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic spray, for tests and replays
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            session: None,
            rng,
            fill_iteration_factor: FloodFill::DEFAULT_ITERATION_FACTOR,
        }
    }

    pub fn with_fill_iteration_factor(mut self, factor: f32) -> Self {
        self.fill_iteration_factor = factor;
        self
    }

    pub fn session(&self) -> Option<&StrokeSession> {
        self.session.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.session.is_none()
    }

    pub fn current_state_name(&self) -> &'static str {
        match &self.session {
            None => "Idle",
            Some(StrokeSession::Stroking { .. }) => "Stroking",
            Some(StrokeSession::PreviewingShape { .. }) => "PreviewingShape",
        }
    }

    pub fn on_press(
        &mut self,
        point: Pos2,
        config: &ToolConfig,
        surface: &mut PixelSurface,
        prompt: &mut dyn TextPrompt,
    ) -> SurfaceResult<ToolOutcome> {
        if self.session.is_some() {
            // Callers close sessions with `cancel` first so a freehand path can be recorded
            log::warn!("Press while {}; dropping the open session", self.current_state_name());
            self.cancel(surface);
        }

        let tool = config.active_tool;
        match tool {
            ToolKind::Pencil => {
                self.session = Some(StrokeSession::Stroking { tool, last: point });
                Ok(ToolOutcome::Pending)
            }
            ToolKind::Eraser => {
                eraser_segment(surface, point, point, config);
                self.session = Some(StrokeSession::Stroking { tool, last: point });
                Ok(ToolOutcome::Pending)
            }
            ToolKind::Spray => {
                spray(surface, point, config, &mut self.rng);
                self.session = Some(StrokeSession::Stroking { tool, last: point });
                Ok(ToolOutcome::Pending)
            }
            ToolKind::Shape | ToolKind::Line => {
                self.session = Some(StrokeSession::PreviewingShape {
                    tool,
                    anchor: point,
                    current: point,
                    pre_shape: surface.snapshot(),
                });
                Ok(ToolOutcome::Pending)
            }
            ToolKind::Text => {
                let text = prompt.request_text().filter(|t| !t.is_empty());
                let Some(text) = text else {
                    return Ok(ToolOutcome::Unchanged);
                };
                surface.stamp_text(&text, point, config.text_px(), TextAnchor::TopLeft, config.color);
                Ok(ToolOutcome::Commit)
            }
            ToolKind::Emoji => {
                surface.stamp_text(
                    &config.active_emoji,
                    point,
                    config.emoji_px(),
                    TextAnchor::Center,
                    config.color,
                );
                Ok(ToolOutcome::Commit)
            }
            ToolKind::Fill => {
                let engine = FloodFill::new(config.fill_tolerance)
                    .with_iteration_factor(self.fill_iteration_factor);
                match surface.flood_fill(&engine, point, config.color) {
                    Ok(FillOutcome::Filled { .. }) => Ok(ToolOutcome::Commit),
                    Ok(FillOutcome::Unchanged) => Ok(ToolOutcome::Unchanged),
                    Err(SurfaceError::OutOfBounds { x, y }) => {
                        log::debug!("Fill seed ({}, {}) out of bounds", x, y);
                        Ok(ToolOutcome::Unchanged)
                    }
                    Err(err) => Err(err),
                }
            }
            ToolKind::Ai => Err(SurfaceError::NotImplemented(tool.name())),
        }
    }

    pub fn on_move(&mut self, point: Pos2, config: &ToolConfig, surface: &mut PixelSurface) -> ToolOutcome {
        match &mut self.session {
            None => ToolOutcome::Idle,
            Some(StrokeSession::Stroking { tool, last }) => {
                match tool {
                    ToolKind::Eraser => eraser_segment(surface, *last, point, config),
                    ToolKind::Spray => spray(surface, point, config, &mut self.rng),
                    _ => pencil_segment(surface, *last, point, config),
                }
                *last = point;
                ToolOutcome::Pending
            }
            Some(StrokeSession::PreviewingShape { tool, anchor, current, pre_shape }) => {
                surface.restore(pre_shape);
                draw_shape(surface, *tool, config, *anchor, point);
                *current = point;
                ToolOutcome::Pending
            }
        }
    }

    pub fn on_release(&mut self, config: &ToolConfig, surface: &mut PixelSurface) -> ToolOutcome {
        match self.session.take() {
            None => ToolOutcome::Idle,
            Some(StrokeSession::Stroking { .. }) => ToolOutcome::Commit,
            Some(StrokeSession::PreviewingShape { tool, anchor, current, pre_shape }) => {
                // Redraw once more so the committed pixels match the last preview exactly
                surface.restore(&pre_shape);
                draw_shape(surface, tool, config, anchor, current);
                ToolOutcome::Commit
            }
        }
    }

    /// Ends any session without a release, e.g. on tool switch.
    ///
    /// A shape preview is discarded and the pre-shape pixels restored. A
    /// freehand path is already on the surface, so it is finalised instead.
    pub fn cancel(&mut self, surface: &mut PixelSurface) -> ToolOutcome {
        match self.session.take() {
            None => ToolOutcome::Idle,
            Some(StrokeSession::Stroking { .. }) => ToolOutcome::Commit,
            Some(StrokeSession::PreviewingShape { pre_shape, .. }) => {
                surface.restore(&pre_shape);
                ToolOutcome::Unchanged
            }
        }
    }
}
