use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::network::network::{Network, NetworkOptions};
use crate::network::topology::Topology;

/// A serializable description of a network architecture plus the
/// hyperparameters it trains with.
///
/// Only the shape is stored, never trained weights; every `build` starts
/// from fresh random weights.
///
/// ```json
/// { "name": "xor", "topology": [2, 4, 1], "options": { "init_scale": 1.0 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name, used in log output.
    pub name: String,
    /// Validated on load; a bad topology fails deserialization.
    pub topology: Topology,
    #[serde(default)]
    pub options: NetworkOptions,
}

impl NetworkSpec {
    pub fn new(name: impl Into<String>, topology: Topology) -> NetworkSpec {
        NetworkSpec {
            name: name.into(),
            topology,
            options: NetworkOptions::default(),
        }
    }

    pub fn build(&self) -> Network {
        self.build_with_rng(&mut rand::thread_rng())
    }

    pub fn build_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Network {
        Network::build_with_rng(self.topology.clone(), &self.options, rng)
    }

    /// Serializes the network spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file; topology and options
    /// are validated while parsing.
    pub fn load_json(path: impl AsRef<Path>) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetError;
    use crate::optim::momentum::UpdateRule;

    #[test]
    fn test_defaults_fill_missing_options() {
        let spec: NetworkSpec =
            serde_json::from_str(r#"{"name": "xor", "topology": [2, 4, 1]}"#).unwrap();
        assert_eq!(spec.options, NetworkOptions::default());
        assert_eq!(spec.topology.layers(), &[2, 4, 1]);
    }

    #[test]
    fn test_partial_options() {
        let json = r#"{
            "name": "acc",
            "topology": [3, 1],
            "options": { "optimizer": { "rule": "accumulate", "alpha": 0.5 }, "smoothing": 10.0 }
        }"#;
        let spec: NetworkSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.options.optimizer.rule, UpdateRule::Accumulate);
        assert_eq!(spec.options.optimizer.alpha, 0.5);
        assert_eq!(spec.options.optimizer.eta, 0.15);
        assert_eq!(spec.options.smoothing, 10.0);
        assert_eq!(spec.build().layers().len(), 2);
    }

    #[test]
    fn test_invalid_topology_fails_to_load() {
        let res = serde_json::from_str::<NetworkSpec>(r#"{"name": "bad", "topology": [2, 0, 1]}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_invalid_options_fail_to_load() {
        for options in [
            r#"{"smoothing": -1.0}"#,
            r#"{"init_scale": -5.0}"#,
            r#"{"init_scale": 0.0}"#,
            r#"{"optimizer": {"eta": -0.15}}"#,
            r#"{"optimizer": {"alpha": -0.1}}"#,
        ] {
            let json = format!(r#"{{"name": "bad", "topology": [2, 1], "options": {options}}}"#);
            let err = serde_json::from_str::<NetworkSpec>(&json).unwrap_err();
            assert!(err.to_string().contains("invalid network options"), "{err}");
        }
    }

    #[test]
    fn test_load_json_rejects_invalid_options() {
        let path = std::env::temp_dir()
            .join(format!("tanh_mlp_bad_options_{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"name": "bad", "topology": [2, 2, 1], "options": {"smoothing": -1.0, "init_scale": -5.0}}"#,
        )
        .unwrap();
        let res = NetworkSpec::load_json(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(res, Err(NetError::Json(_))));
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("tanh_mlp_spec_{}.json", std::process::id()));
        let spec = NetworkSpec::new("file", Topology::new(vec![2, 3, 1]).unwrap());
        spec.save_json(&path).unwrap();
        let loaded = NetworkSpec::load_json(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, spec);

        assert!(matches!(NetworkSpec::load_json(&path), Err(NetError::Io(_))));
    }
}
