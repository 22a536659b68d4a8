//! JSON exporter for offline plotting.
//!
//! Exports sampled simulation frames (phases + order parameter) as JSON.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use uuid::Uuid;

/// A single frame of simulation data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimFrame {
    /// Integrator tick
    pub tick: u64,

    /// Simulated time (tick × Δt)
    pub time: f64,

    /// Coupling strength in effect for this tick
    pub coupling: f64,

    /// Order parameter r
    pub order_parameter: f64,

    /// Node phases in index order
    pub phases: Vec<f64>,
}

/// Complete simulation export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimExport {
    /// Unique id of this run
    pub run_id: Uuid,

    /// Graph name or file
    pub graph: String,

    /// Seed used
    pub seed: u64,

    /// Integration time step
    pub dt: f64,

    /// Node identifiers, matching `phases` order
    pub node_ids: Vec<String>,

    /// Undirected edges as index pairs
    pub edges: Vec<(usize, usize)>,

    /// All frames
    pub frames: Vec<SimFrame>,

    /// Order parameter at the end of the run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_order_parameter: Option<f64>,
}

impl SimExport {
    /// Creates a new export container.
    pub fn new(graph: &str, seed: u64, dt: f64) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            graph: graph.to_string(),
            seed,
            dt,
            node_ids: Vec::new(),
            edges: Vec::new(),
            frames: Vec::new(),
            final_order_parameter: None,
        }
    }

    /// Records the topology once.
    pub fn set_topology(&mut self, node_ids: &[String], edges: impl IntoIterator<Item = (usize, usize)>) {
        self.node_ids = node_ids.to_vec();
        self.edges = edges.into_iter().collect();
    }

    /// Adds a frame.
    pub fn add_frame(&mut self, frame: SimFrame) {
        self.frames.push(frame);
    }

    /// Finalizes the export.
    pub fn finalize(&mut self, order_parameter: f64) {
        self.final_order_parameter = Some(order_parameter);
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_roundtrip_file() {
        let mut export = SimExport::new("ring", 42, 0.1);
        export.set_topology(&["a".to_string(), "b".to_string()], [(0, 1)]);
        export.add_frame(SimFrame {
            tick: 1,
            time: 0.1,
            coupling: 0.5,
            order_parameter: 0.9,
            phases: vec![0.1, 0.2],
        });
        export.finalize(0.9);

        let path = std::env::temp_dir().join(format!("kuramoto-export-{}.json", export.run_id));
        let path_str = path.to_string_lossy().to_string();
        export.write_to_file(&path_str).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        let back: SimExport = serde_json::from_str(&text).unwrap();

        assert_eq!(back.run_id, export.run_id);
        assert_eq!(back.frames.len(), 1);
        assert_eq!(back.edges, vec![(0, 1)]);
        assert_eq!(back.final_order_parameter, Some(0.9));
    }

    #[test]
    fn test_unfinished_export_omits_final() {
        let export = SimExport::new("path", 1, 0.1);
        let json = serde_json::to_value(&export).unwrap();
        assert!(json.get("final_order_parameter").is_none());
    }
}
