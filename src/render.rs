//! Read-only frame snapshots and the adapters that draw them.
//!
//! The engine never paints. After every change that needs a redraw it builds a
//! [`FrameSnapshot`] (world-space geometry plus the viewport) and hands it to a
//! [`RenderAdapter`]. [`SlintModelAdapter`] is the adapter for Slint hosts: it
//! converts the snapshot to screen space and syncs it into bound `VecModel`s in place.
//!
//! # Example
//!
//! ```ignore
//! let nodes = Rc::new(VecModel::<NodeData>::default());
//! let links = Rc::new(VecModel::<LinkPath>::default());
//!
//! let mut adapter = SlintModelAdapter::new();
//! adapter.bind_nodes(nodes.clone(), |node, rect| NodeData {
//!     id: usize::from(node.id) as i32,
//!     title: node.title.as_str().into(),
//!     color: node.color,
//!     x: rect.x, y: rect.y, width: rect.width, height: rect.height,
//! });
//! adapter.bind_links(links.clone(), |id, path, color, width| LinkPath { id, path, color, width });
//! adapter.on_overlay({
//!     let w = window.as_weak();
//!     move |overlay| {
//!         if let Some(w) = w.upgrade() {
//!             w.set_grid_commands(overlay.grid_commands.clone());
//!             w.set_rubber_band(overlay.rubber_band.clone().unwrap_or_default());
//!         }
//!     }
//! });
//!
//! window.set_nodes(ModelRc::from(nodes));
//! window.set_links(ModelRc::from(links));
//! ```

use crate::controller::InteractionController;
use crate::graph::{ConnectionId, GraphModel, NodeId, NodeKind, PortDirection, PortId};
use crate::grid::generate_grid_commands;
use crate::hit_test::Rect;
use crate::image::{AssetHandle, ImageSet};
use crate::path::CubicBezier;
use crate::viewport::Viewport;
use slint::{Color, Model, SharedString, VecModel};
use std::rc::Rc;

/// Line width of established connections
pub const LINK_WIDTH: f32 = 3.0;
/// Line width of the rubber band while connecting
pub const RUBBER_BAND_WIDTH: f32 = 2.0;

pub fn link_color() -> Color {
    Color::from_rgb_u8(255, 255, 0)
}

pub fn rubber_band_color() -> Color {
    Color::from_rgb_u8(128, 128, 128)
}

/// Receives a snapshot whenever the canvas needs repainting.
pub trait RenderAdapter {
    fn render(&mut self, frame: &FrameSnapshot);
}

/// Adapter that draws nothing, for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderAdapter;

impl RenderAdapter for NullRenderAdapter {
    fn render(&mut self, _frame: &FrameSnapshot) {}
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageView {
    pub name: String,
    /// `None` draws a placeholder with the name
    pub handle: Option<AssetHandle>,
}

impl ImageView {
    pub fn is_available(&self) -> bool {
        self.handle.is_some()
    }

    fn collect(set: &ImageSet) -> Vec<ImageView> {
        set.iter()
            .map(|(name, handle)| ImageView { name: name.to_string(), handle: handle.cloned() })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortView {
    pub id: PortId,
    pub direction: PortDirection,
    pub name: String,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    pub id: NodeId,
    pub kind: NodeKind,
    pub title: String,
    pub color: Color,
    pub rect: Rect,
    pub ports: Vec<PortView>,
    pub inputs: Vec<ImageView>,
    pub outputs: Vec<ImageView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkView {
    pub id: ConnectionId,
    pub start: (f32, f32),
    pub end: (f32, f32),
    /// World-space SVG path
    pub path: String,
}

/// The pending connection, from its port to the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct RubberBand {
    pub start: (f32, f32),
    pub end: (f32, f32),
}

/// Everything needed to draw one frame. Geometry is in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    /// Bottom first
    pub nodes: Vec<NodeView>,
    pub links: Vec<LinkView>,
    pub rubber_band: Option<RubberBand>,
    pub viewport: Viewport,
    pub canvas_size: (f32, f32),
    /// Screen-space grid path for the current canvas size
    pub grid_commands: String,
    /// Last status line set by a command
    pub status: Option<String>,
}

impl FrameSnapshot {
    pub fn capture(
        graph: &GraphModel,
        viewport: &Viewport,
        controller: &InteractionController,
        canvas_size: (f32, f32),
        status: Option<&str>,
    ) -> Self {
        let layout = &graph.config().layout;
        let nodes = graph
            .nodes_in_draw_order()
            .map(|node| NodeView {
                id: node.id(),
                kind: node.kind(),
                title: node.title().to_string(),
                color: node.kind().color(),
                rect: node.rect(layout),
                ports: node
                    .input_ports()
                    .iter()
                    .chain(node.output_ports())
                    .filter_map(|id| {
                        let port = graph.port(*id)?;
                        Some(PortView {
                            id: *id,
                            direction: port.direction(),
                            name: port.name().to_string(),
                            rect: graph.port_bounds(*id)?,
                        })
                    })
                    .collect(),
                inputs: ImageView::collect(node.input_images()),
                outputs: ImageView::collect(node.output_images()),
            })
            .collect();

        let links = graph
            .connections()
            .iter()
            .filter_map(|connection| {
                let (start, end) = graph.connection_endpoints(connection.id)?;
                Some(LinkView {
                    id: connection.id,
                    start,
                    end,
                    path: CubicBezier::from_endpoints(start, end).to_svg_path(),
                })
            })
            .collect();

        let rubber_band = controller
            .rubber_band(graph, viewport)
            .map(|(start, end)| RubberBand { start, end });

        Self {
            nodes,
            links,
            rubber_band,
            viewport: viewport.clone(),
            canvas_size,
            grid_commands: generate_grid_commands(
                canvas_size.0,
                canvas_size.1,
                viewport,
                &graph.config().grid,
            ),
            status: status.map(str::to_string),
        }
    }

    pub fn screen_rect(&self, rect: Rect) -> Rect {
        let (x, y) = self.viewport.to_screen((rect.x, rect.y));
        let zoom = self.viewport.zoom();
        Rect::new(x, y, rect.width * zoom, rect.height * zoom)
    }

    /// SVG path of a curve between two world points, in screen space
    pub fn screen_path(&self, start: (f32, f32), end: (f32, f32)) -> String {
        CubicBezier::from_endpoints(start, end)
            .map(|point| self.viewport.to_screen(point))
            .to_svg_path()
    }
}

/// Screen-space pieces that are not rows of a model.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Overlay {
    pub grid_commands: SharedString,
    pub rubber_band: Option<SharedString>,
    pub rubber_band_color: Color,
    pub rubber_band_width: f32,
    pub zoom: f32,
    pub pan: (f32, f32),
    pub status: SharedString,
}

/// Internal trait for syncing one kind of row into a Slint model.
trait ModelSyncer {
    fn sync(&self, frame: &FrameSnapshot);
}

struct NodeSyncer<T, F> {
    model: Rc<VecModel<T>>,
    constructor: F,
}

impl<T, F> ModelSyncer for NodeSyncer<T, F>
where
    T: Clone + 'static,
    F: Fn(&NodeView, Rect) -> T,
{
    fn sync(&self, frame: &FrameSnapshot) {
        let rows = frame
            .nodes
            .iter()
            .map(|node| (self.constructor)(node, frame.screen_rect(node.rect)));
        sync_rows(&self.model, rows);
    }
}

struct LinkSyncer<T, F> {
    model: Rc<VecModel<T>>,
    constructor: F,
}

impl<T, F> ModelSyncer for LinkSyncer<T, F>
where
    T: Clone + 'static,
    F: Fn(i32, SharedString, Color, f32) -> T,
{
    fn sync(&self, frame: &FrameSnapshot) {
        let rows = frame.links.iter().map(|link| {
            let path = SharedString::from(frame.screen_path(link.start, link.end).as_str());
            (self.constructor)(usize::from(link.id) as i32, path, link_color(), LINK_WIDTH)
        });
        sync_rows(&self.model, rows);
    }
}

/// Update existing rows, append new ones, drop the excess
fn sync_rows<T: Clone + 'static>(model: &VecModel<T>, rows: impl Iterator<Item = T>) {
    let mut count = 0;
    for (i, item) in rows.enumerate() {
        if i < model.row_count() {
            model.set_row_data(i, item);
        } else {
            model.push(item);
        }
        count = i + 1;
    }
    while model.row_count() > count {
        model.remove(model.row_count() - 1);
    }
}

/// Syncs snapshots into bound Slint models.
///
/// Bind the models once; every [`render`](RenderAdapter::render) afterwards updates them
/// in place, so Slint only re-evaluates the rows that changed.
#[derive(Default)]
pub struct SlintModelAdapter {
    syncers: Vec<Box<dyn ModelSyncer>>,
    overlay: Option<Box<dyn Fn(&Overlay)>>,
}

impl SlintModelAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sync nodes, bottom first, into `model`
    ///
    /// # Arguments
    ///
    /// * `model` - The VecModel to sync to
    /// * `constructor` - Builds a row from the node and its screen-space rectangle
    pub fn bind_nodes<T, F>(&mut self, model: Rc<VecModel<T>>, constructor: F)
    where
        T: Clone + 'static,
        F: Fn(&NodeView, Rect) -> T + 'static,
    {
        self.syncers.push(Box::new(NodeSyncer { model, constructor }));
    }

    /// Sync connections into `model`
    ///
    /// # Arguments
    ///
    /// * `model` - The VecModel to sync to
    /// * `constructor` - Builds a row from (id, screen-space path, color, line width)
    pub fn bind_links<T, F>(&mut self, model: Rc<VecModel<T>>, constructor: F)
    where
        T: Clone + 'static,
        F: Fn(i32, SharedString, Color, f32) -> T + 'static,
    {
        self.syncers.push(Box::new(LinkSyncer { model, constructor }));
    }

    /// Receive the grid, rubber band and viewport on every frame
    pub fn on_overlay(&mut self, callback: impl Fn(&Overlay) + 'static) {
        self.overlay = Some(Box::new(callback));
    }
}

impl RenderAdapter for SlintModelAdapter {
    fn render(&mut self, frame: &FrameSnapshot) {
        for syncer in &self.syncers {
            syncer.sync(frame);
        }
        if let Some(callback) = &self.overlay {
            let overlay = Overlay {
                grid_commands: frame.grid_commands.as_str().into(),
                rubber_band: frame
                    .rubber_band
                    .as_ref()
                    .map(|band| frame.screen_path(band.start, band.end).as_str().into()),
                rubber_band_color: rubber_band_color(),
                rubber_band_width: RUBBER_BAND_WIDTH,
                zoom: frame.viewport.zoom(),
                pan: frame.viewport.pan_offset(),
                status: frame.status.as_deref().unwrap_or_default().into(),
            };
            callback(&overlay);
        }
    }
}
