//! Renderer abstraction and the graph view that owns its single instance.

use anyhow::Result;
use std::path::PathBuf;

use super::{build_vis_graph, tooltip_text, GraphOptions, VisEdge, VisNode};
use crate::data::{GraphData, GraphNode};

/// A live network created by a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphHandle {
    pub id: u64,
    /// Where the rendered graph can be opened, if it lives in a file
    pub location: Option<PathBuf>,
}

/// External graph rendering capability.
pub trait GraphRenderer {
    fn render(
        &mut self,
        nodes: &[VisNode],
        edges: &[VisEdge],
        options: &GraphOptions,
    ) -> Result<GraphHandle>;

    fn destroy(&mut self, handle: GraphHandle) -> Result<()>;

    fn set_physics(&mut self, handle: &GraphHandle, enabled: bool) -> Result<()>;

    fn fit(&mut self, handle: &GraphHandle) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GraphStatus {
    #[default]
    NotLoaded,
    Loading,
    Ready,
    Failed(String),
}

/// Links tab state. Holds at most one live renderer handle.
pub struct GraphView {
    renderer: Box<dyn GraphRenderer>,
    handle: Option<GraphHandle>,
    status: GraphStatus,
    nodes: Vec<GraphNode>,
    edge_count: usize,
    physics: bool,
    selected: usize,
    /// First visible row of the node list
    pub scroll: usize,
}

impl std::fmt::Debug for GraphView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphView")
            .field("handle", &self.handle)
            .field("status", &self.status)
            .field("nodes", &self.nodes.len())
            .field("edge_count", &self.edge_count)
            .field("physics", &self.physics)
            .finish()
    }
}

impl GraphView {
    pub fn new(renderer: Box<dyn GraphRenderer>, physics: bool) -> Self {
        Self {
            renderer,
            handle: None,
            status: GraphStatus::NotLoaded,
            nodes: Vec::new(),
            edge_count: 0,
            physics,
            selected: 0,
            scroll: 0,
        }
    }

    /// Whether activating the tab should fetch the graph. Only the first
    /// activation does; a failed load is retried on the next activation.
    pub fn needs_load(&self) -> bool {
        self.handle.is_none() && matches!(self.status, GraphStatus::NotLoaded | GraphStatus::Failed(_))
    }

    pub fn mark_loading(&mut self) {
        self.status = GraphStatus::Loading;
    }

    pub fn status(&self) -> &GraphStatus {
        &self.status
    }

    pub fn handle(&self) -> Option<&GraphHandle> {
        self.handle.as_ref()
    }

    /// Render new data, destroying the previous instance first.
    pub fn show(&mut self, data: &GraphData) -> Result<()> {
        self.release();

        let (nodes, edges) = build_vis_graph(data);
        let options = GraphOptions::new(self.physics);
        match self.renderer.render(&nodes, &edges, &options) {
            Ok(handle) => {
                tracing::info!(
                    "Rendered link graph: {} nodes, {} edges",
                    nodes.len(),
                    edges.len()
                );
                self.handle = Some(handle);
                self.nodes = data.nodes.clone();
                self.edge_count = data.edges.len();
                self.selected = 0;
                self.scroll = 0;
                self.status = GraphStatus::Ready;
                Ok(())
            }
            Err(e) => {
                self.status = GraphStatus::Failed(format!("{:#}", e));
                Err(e)
            }
        }
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = GraphStatus::Failed(message.into());
    }

    /// Destroy the live instance, if any.
    pub fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = self.renderer.destroy(handle) {
                tracing::warn!("Failed to destroy graph instance: {:#}", e);
            }
        }
    }

    pub fn physics(&self) -> bool {
        self.physics
    }

    /// ВКЛ / ВЫКЛ label for the physics control.
    pub fn physics_label(&self) -> &'static str {
        if self.physics {
            "ВКЛ"
        } else {
            "ВЫКЛ"
        }
    }

    /// Flip physics; a no-op without a live instance.
    pub fn toggle_physics(&mut self) -> Result<()> {
        let Some(handle) = &self.handle else {
            return Ok(());
        };
        self.renderer.set_physics(handle, !self.physics)?;
        self.physics = !self.physics;
        Ok(())
    }

    /// Re-fit the viewport to all nodes.
    pub fn fit(&mut self) -> Result<()> {
        let Some(handle) = &self.handle else {
            return Ok(());
        };
        self.renderer.fit(handle)?;
        self.scroll = 0;
        Ok(())
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_node(&self) -> Option<&GraphNode> {
        self.nodes.get(self.selected)
    }

    pub fn select(&mut self, index: usize) {
        if !self.nodes.is_empty() {
            self.selected = index.min(self.nodes.len() - 1);
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        if self.nodes.is_empty() {
            return;
        }
        let max = self.nodes.len() as isize - 1;
        self.selected = (self.selected as isize + delta).clamp(0, max) as usize;
    }

    /// Adjust `scroll` so the selection sits inside a list of `height` rows.
    pub fn keep_selection_visible(&mut self, height: usize) {
        let height = height.max(1);
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + height {
            self.scroll = self.selected + 1 - height;
        }
    }

    pub fn tooltip(&self, index: usize) -> Option<String> {
        self.nodes.get(index).map(tooltip_text)
    }
}

impl Drop for GraphView {
    fn drop(&mut self) {
        self.release();
    }
}
