//! Renderer that writes a self-contained vis-network page.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::renderer::{GraphHandle, GraphRenderer};
use super::{GraphOptions, VisEdge, VisNode};

const VIS_NETWORK_JS: &str = "https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js";

struct Page {
    path: PathBuf,
    nodes: String,
    edges: String,
    options: GraphOptions,
    fit_on_load: bool,
}

/// Writes one HTML file per rendered graph under `output_dir`.
pub struct HtmlGraphRenderer {
    output_dir: PathBuf,
    browse_base: String,
    next_id: u64,
    pages: HashMap<u64, Page>,
}

impl HtmlGraphRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, browse_base: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            browse_base: browse_base.into().trim_end_matches('/').to_string(),
            next_id: 0,
            pages: HashMap::new(),
        }
    }

    fn write(&self, page: &Page) -> Result<()> {
        let options = to_script_json(&page.options)?;
        let html = page_html(
            &page.nodes,
            &page.edges,
            &options,
            &self.browse_base,
            page.options.physics.enabled,
            page.fit_on_load,
        );
        std::fs::write(&page.path, html)
            .with_context(|| format!("Failed to write graph page {}", page.path.display()))
    }

    fn page(&self, handle: &GraphHandle) -> Result<&Page> {
        self.pages
            .get(&handle.id)
            .with_context(|| format!("Unknown graph instance {}", handle.id))
    }
}

impl GraphRenderer for HtmlGraphRenderer {
    fn render(
        &mut self,
        nodes: &[VisNode],
        edges: &[VisEdge],
        options: &GraphOptions,
    ) -> Result<GraphHandle> {
        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create {}", self.output_dir.display()))?;

        self.next_id += 1;
        let id = self.next_id;
        let page = Page {
            path: self.output_dir.join(format!("link-graph-{}.html", id)),
            nodes: to_script_json(nodes)?,
            edges: to_script_json(edges)?,
            options: options.clone(),
            fit_on_load: false,
        };
        self.write(&page)?;

        let handle = GraphHandle {
            id,
            location: Some(page.path.clone()),
        };
        self.pages.insert(id, page);
        Ok(handle)
    }

    fn destroy(&mut self, handle: GraphHandle) -> Result<()> {
        let Some(page) = self.pages.remove(&handle.id) else {
            return Ok(());
        };
        remove_if_exists(&page.path)
    }

    fn set_physics(&mut self, handle: &GraphHandle, enabled: bool) -> Result<()> {
        let page = self
            .pages
            .get_mut(&handle.id)
            .with_context(|| format!("Unknown graph instance {}", handle.id))?;
        page.options.physics.enabled = enabled;
        let page = self.page(handle)?;
        self.write(page)
    }

    /// Rewrites the page so the next load animates to fit all nodes.
    fn fit(&mut self, handle: &GraphHandle) -> Result<()> {
        let page = self
            .pages
            .get_mut(&handle.id)
            .with_context(|| format!("Unknown graph instance {}", handle.id))?;
        page.fit_on_load = true;
        let page = self.page(handle)?;
        self.write(page)
    }
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}

/// JSON safe to embed inside a `<script>` element.
fn to_script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value).context("Failed to serialize graph data")?;
    Ok(json.replace("</", "<\\/"))
}

fn page_html(
    nodes: &str,
    edges: &str,
    options: &str,
    browse_base: &str,
    physics: bool,
    fit_on_load: bool,
) -> String {
    let browse_base = serde_json::to_string(browse_base).unwrap_or_else(|_| "\"\"".to_string());
    let physics_label = if physics { "ВКЛ" } else { "ВЫКЛ" };
    format!(
        r##"<!DOCTYPE html>
<html lang="ru">
<head>
<meta charset="utf-8">
<title>Граф связей задач</title>
<script src="{vis}"></script>
<style>
  body {{ font-family: -apple-system, "Segoe UI", sans-serif; margin: 20px; background: #f5f6fa; }}
  .toolbar {{ display: flex; gap: 10px; align-items: center; margin-bottom: 20px; }}
  .toolbar button {{ padding: 8px 16px; border: none; border-radius: 6px; background: #667eea; color: white; cursor: pointer; }}
  .counts {{ margin-left: auto; background: #f9f9f9; padding: 10px 20px; border-radius: 8px; }}
  #graph {{ width: 100%; height: 600px; border: 2px solid #e0e0e0; border-radius: 10px; background: white; }}
  #tooltip {{ position: absolute; background: rgba(0,0,0,0.85); color: white; padding: 12px 15px;
             border-radius: 8px; font-size: 13px; line-height: 1.6; pointer-events: none; z-index: 9999;
             display: none; max-width: 350px; white-space: pre-line; }}
  .legend {{ margin-top: 20px; background: #f9f9f9; padding: 15px; border-radius: 10px;
            display: grid; grid-template-columns: 1fr 1fr 1fr; gap: 20px; }}
  .swatch {{ display: inline-block; width: 18px; height: 18px; border: 2px solid; border-radius: 4px; vertical-align: middle; margin-right: 6px; }}
  .line {{ display: inline-block; width: 30px; height: 3px; vertical-align: middle; margin-right: 6px; }}
</style>
</head>
<body>
<div class="toolbar">
  <button onclick="fitGraph()">📐 По размеру экрана</button>
  <button onclick="togglePhysics()">⚡ Физика: <span id="physicsStatus">{physics_label}</span></button>
  <div class="counts"><strong>Узлов:</strong> <span id="nodeCount"></span> | <strong>Связей:</strong> <span id="edgeCount"></span></div>
</div>
<div id="graph"></div>
<div id="tooltip"></div>
<div class="legend">
  <div>
    <strong>Статусы (цвет):</strong><br>
    <div><span class="swatch" style="background:#55efc4;border-color:#00b894"></span>Готово</div>
    <div><span class="swatch" style="background:#74b9ff;border-color:#0984e3"></span>В работе</div>
    <div><span class="swatch" style="background:#ffeaa7;border-color:#fdcb6e"></span>Открыто</div>
    <div><span class="swatch" style="background:#dfe6e9;border-color:#b2bec3"></span>Другое</div>
  </div>
  <div>
    <strong>Типы задач (форма):</strong><br>
    <div>⬢ Эпик (шестиугольник)</div>
    <div>● История (овал)</div>
    <div>■ Задача (прямоугольник)</div>
  </div>
  <div>
    <strong>Связи:</strong><br>
    <div><span class="line" style="background:#e74c3c"></span>Входящая связь</div>
    <div><span class="line" style="background:#3498db"></span>Исходящая связь</div>
  </div>
</div>
<script>
  const BROWSE_BASE = {browse_base};
  const nodes = {nodes};
  const edges = {edges};
  const options = {options};
  const FIT_ON_LOAD = {fit_on_load};

  document.getElementById('nodeCount').textContent = nodes.length;
  document.getElementById('edgeCount').textContent = edges.length;

  const container = document.getElementById('graph');
  const network = new vis.Network(container, {{
    nodes: new vis.DataSet(nodes),
    edges: new vis.DataSet(edges)
  }}, options);

  const tooltip = document.getElementById('tooltip');
  network.on('hoverNode', function (params) {{
    const node = nodes.find(n => n.id === params.node);
    if (node && node.title) {{
      tooltip.textContent = node.title;
      tooltip.style.display = 'block';
    }}
  }});
  network.on('blurNode', function () {{
    tooltip.style.display = 'none';
  }});
  container.addEventListener('mousemove', function (e) {{
    if (tooltip.style.display === 'block') {{
      tooltip.style.left = (e.pageX + 15) + 'px';
      tooltip.style.top = (e.pageY + 15) + 'px';
    }}
  }});
  network.on('click', function (params) {{
    if (params.nodes.length > 0) {{
      window.open(BROWSE_BASE + '/browse/' + encodeURIComponent(params.nodes[0]), '_blank');
    }}
  }});

  function fitGraph() {{
    network.fit({{ animation: {{ duration: 1000, easingFunction: 'easeInOutQuad' }} }});
  }}

  if (FIT_ON_LOAD) {{
    network.once('afterDrawing', fitGraph);
  }}

  function togglePhysics() {{
    const enabled = !network.physics.options.enabled;
    network.setOptions({{ physics: {{ enabled: enabled }} }});
    document.getElementById('physicsStatus').textContent = enabled ? 'ВКЛ' : 'ВЫКЛ';
  }}
</script>
</body>
</html>
"##,
        vis = VIS_NETWORK_JS,
        physics_label = physics_label,
        browse_base = browse_base,
        nodes = nodes,
        edges = edges,
        options = options,
        fit_on_load = fit_on_load,
    )
}
