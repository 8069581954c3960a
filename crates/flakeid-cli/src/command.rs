use std::io::Write;

use flakeid::{
    FileStore, LockSnowflakeGenerator, SnowflakeId, SystemClock, ThreadRandom, default_generator,
    random_generator_with,
};
use serde::Serialize;
use tracing::info;

use crate::config::{Action, Config, IdentitySource};

/// The fields of one decoded ID, as printed by `decode --json`.
#[derive(Debug, Serialize)]
struct Decoded {
    id: SnowflakeId,
    timestamp: u64,
    datacenter_id: u64,
    worker_id: u64,
    sequence: u64,
}

impl From<SnowflakeId> for Decoded {
    fn from(id: SnowflakeId) -> Self {
        Self {
            id,
            timestamp: id.timestamp(),
            datacenter_id: id.datacenter_id(),
            worker_id: id.worker_id(),
            sequence: id.sequence(),
        }
    }
}

fn generator_for(source: &IdentitySource) -> anyhow::Result<LockSnowflakeGenerator<SystemClock>> {
    let generator = match source {
        IdentitySource::Explicit(identity) => {
            LockSnowflakeGenerator::with_time(*identity, SystemClock)
        }
        IdentitySource::File(path) => random_generator_with(&FileStore::new(path), &ThreadRandom)?,
        IdentitySource::Random => default_generator()?.clone(),
    };

    let identity = generator.identity();
    info!(
        worker_id = identity.worker_id(),
        datacenter_id = identity.datacenter_id(),
        "using node identity"
    );
    Ok(generator)
}

/// Runs the configured action, writing its output to `out`.
pub fn run(config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    match &config.action {
        Action::Generate { count } => {
            let generator = generator_for(&config.identity)?;
            let ids = (0..*count)
                .map(|_| generator.next_id())
                .collect::<Result<Vec<_>, _>>()?;
            write_ids(&ids, config.json, out)
        }
        Action::Decode { ids } => write_decoded(ids, config.json, out),
    }
}

fn write_ids(ids: &[SnowflakeId], json: bool, out: &mut impl Write) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer(&mut *out, ids)?;
        writeln!(out)?;
    } else {
        for id in ids {
            writeln!(out, "{id}")?;
        }
    }
    Ok(())
}

fn write_decoded(ids: &[SnowflakeId], json: bool, out: &mut impl Write) -> anyhow::Result<()> {
    let decoded: Vec<Decoded> = ids.iter().copied().map(Decoded::from).collect();
    if json {
        serde_json::to_writer(&mut *out, &decoded)?;
        writeln!(out)?;
    } else {
        for d in &decoded {
            writeln!(
                out,
                "{} timestamp={} datacenter_id={} worker_id={} sequence={}",
                d.id, d.timestamp, d.datacenter_id, d.worker_id, d.sequence
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flakeid::NodeIdentity;

    fn run_to_string(config: &Config) -> String {
        let mut out = Vec::new();
        run(config, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn generates_requested_count_with_explicit_identity() {
        let config = Config {
            identity: IdentitySource::Explicit(NodeIdentity::new(5, 10).unwrap()),
            action: Action::Generate { count: 5 },
            json: false,
        };

        let output = run_to_string(&config);
        let ids: Vec<SnowflakeId> = output.lines().map(|l| l.parse().unwrap()).collect();
        assert_eq!(ids.len(), 5);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        for id in ids {
            assert_eq!(id.worker_id(), 5);
            assert_eq!(id.datacenter_id(), 10);
        }
    }

    #[test]
    fn generates_json_array_of_strings() {
        let config = Config {
            identity: IdentitySource::Random,
            action: Action::Generate { count: 3 },
            json: true,
        };

        let output = run_to_string(&config);
        let ids: Vec<String> = serde_json::from_str(&output).unwrap();
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| id.parse::<u64>().is_ok()));
    }

    #[test]
    fn decodes_as_text_and_json() {
        let id = SnowflakeId::from_components(1_700_000_000_000, 10, 5, 7);
        let text = run_to_string(&Config {
            identity: IdentitySource::Random,
            action: Action::Decode { ids: vec![id] },
            json: false,
        });
        assert_eq!(
            text,
            format!("{id} timestamp=1700000000000 datacenter_id=10 worker_id=5 sequence=7\n")
        );

        let json = run_to_string(&Config {
            identity: IdentitySource::Random,
            action: Action::Decode { ids: vec![id] },
            json: true,
        });
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "id": id.to_string(),
                "timestamp": 1_700_000_000_000u64,
                "datacenter_id": 10,
                "worker_id": 5,
                "sequence": 7,
            }])
        );
    }
}
