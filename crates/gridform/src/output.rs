//! Render a `ParseOutput` as the JSON document `gridform` prints to stdout:
//! the style map plus a structural summary. This is output-only; there is
//! no binary or persistence format to round-trip.

use grid_constructs::{ConstructKind, Orientation};
use grid_parse::ParseOutput;
use serde_json::{json, Value};

fn kind_str(kind: ConstructKind) -> &'static str {
    match kind {
        ConstructKind::Table => "table",
        ConstructKind::Matrix => "matrix",
        ConstructKind::KeyValue => "key-value",
        ConstructKind::Tree => "tree",
    }
}

fn orientation_str(o: Orientation) -> &'static str {
    match o {
        Orientation::Regular => "regular",
        Orientation::Transposed => "transposed",
    }
}

pub fn render(output: &ParseOutput) -> Value {
    let blocks: Vec<Value> = output
        .blocks()
        .iter()
        .map(|b| {
            json!({
                "id": b.id.0,
                "rect": {
                    "top": b.rect.top,
                    "left": b.rect.left,
                    "bottom": b.rect.bottom,
                    "right": b.rect.right,
                },
                "clusters": b.clusters.len(),
            })
        })
        .collect();

    let joins: Vec<Value> = output
        .joins()
        .iter()
        .map(|j| {
            json!({
                "a": j.a.0,
                "b": j.b.0,
                "type": match j.join_type {
                    grid_joins::JoinType::Linked => "linked",
                    grid_joins::JoinType::Locked => "locked",
                },
            })
        })
        .collect();

    let constructs: Vec<Value> = output
        .constructs()
        .iter()
        .filter_map(|(cr, construct)| {
            construct.map(|c| {
                json!({
                    "block": cr.block.0,
                    "cluster": cr.index,
                    "kind": kind_str(c.kind),
                    "orientation": c.orientation.map(orientation_str),
                })
            })
        })
        .collect();

    json!({
        "blocks": blocks,
        "joins": joins,
        "block_subclusters": output.block_subclusters().len(),
        "block_clusters": output.block_clusters().len(),
        "constructs": constructs,
        "style": output.style().to_json(),
    })
}
