// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![cfg(feature = "serde")]
#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]
//! JSON configuration round-trip.
//!
//! ```sh
//! cargo test --package upf-core --test config_serde --features serde
//! ```

use upf_core::{DivisionConfig, HVSize};

#[test]
fn config_round_trips_through_json() {
    let config = DivisionConfig {
        cell_size: HVSize::new(3.0, 2.0),
        workers: 4,
        log_pair_generation: true,
    };
    let json = serde_json::to_string(&config).unwrap();
    let back: DivisionConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
    assert_eq!(back.parallel_phase().map(|p| p.num_jobs()), Some(4));
}

#[test]
fn missing_fields_use_defaults() {
    let config: DivisionConfig = serde_json::from_str(r#"{ "workers": 2 }"#).unwrap();
    assert_eq!(config.cell_size, HVSize::uniform(1.0));
    assert_eq!(config.workers, 2);
    assert!(!config.log_pair_generation);
    assert!(config.validate().is_ok());
}
