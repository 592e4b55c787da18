// Copyright (c) 2026 Aura PoCA Contributors
// SPDX-License-Identifier: Apache-2.0
#![no_main]

use arbitrary::Arbitrary;
use aura_core::hash::hash_text;
use aura_core::MerkleTree;
use aura_verifier::{verify_proof, ProofStep};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    leaf: String,
    root: String,
    steps: Vec<(String, String)>,
    events: Vec<String>,
    index: usize,
}

fuzz_target!(|input: Input| {
    // Verification must be total over adversarial input.
    let steps: Vec<ProofStep> = input
        .steps
        .into_iter()
        .map(|(sibling, direction)| ProofStep { sibling, direction })
        .collect();
    let _ = verify_proof(&input.leaf, &steps, &input.root);

    // Honestly produced proofs always verify.
    if !input.events.is_empty() {
        let tree = MerkleTree::from_events(&input.events).unwrap();
        let i = input.index % input.events.len();
        let proof = tree.prove(i).unwrap();
        let wire: Vec<ProofStep> =
            serde_json::from_value(serde_json::to_value(&proof).unwrap()).unwrap();
        assert!(verify_proof(
            tree.leaves()[i].as_str(),
            &wire,
            tree.root().as_str()
        ));
        let _ = hash_text(&input.events[i]);
    }
});
