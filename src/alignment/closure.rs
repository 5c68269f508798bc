use log::trace;
use crate::types::{Edit, EditKind, Vertex};
use super::graph::{EditGraph, UNIT_WEIGHT};

fn join(first: &str, second: &str) -> String {
    match (first.is_empty(), second.is_empty()) {
        (true, _) => second.to_string(),
        (_, true) => first.to_string(),
        _ => format!("{} {}", first, second),
    }
}

/// Merges two consecutive edits into one spanning both.
///
/// Two edits of the same kind keep it when that kind is insert, delete or
/// no-op; every other pairing becomes a substitution.
pub fn merge_edits(first: &Edit, second: &Edit) -> Edit {
    let kind = match (first.kind, second.kind) {
        (EditKind::Insert, EditKind::Insert) => EditKind::Insert,
        (EditKind::Delete, EditKind::Delete) => EditKind::Delete,
        (EditKind::NoOp, EditKind::NoOp) => EditKind::NoOp,
        _ => EditKind::Substitute,
    };

    Edit {
        kind,
        start: first.start,
        end: second.end,
        original: join(&first.original, &second.original),
        correction: join(&first.correction, &second.correction),
        unchanged_words: first.unchanged_words + second.unchanged_words,
    }
}

impl EditGraph {
    /// Adds a merged edge `i -> j` wherever a relay `k` gives a strictly
    /// shorter path than the current `i -> j` edge and the merged edit embeds
    /// at most `max_unchanged_words` unchanged tokens. Afterwards drops every
    /// no-op edge longer than one hop.
    pub fn close(&mut self, max_unchanged_words: usize) {
        let vertices = self.vertices.clone();

        for &relay in &vertices {
            // Edges into and out of the relay cannot change while it is the relay
            let predecessors: Vec<Vertex> = vertices
                .iter()
                .copied()
                .filter(|v| self.arcs.contains_key(&(*v, relay)))
                .collect();
            let successors: Vec<Vertex> = vertices
                .iter()
                .copied()
                .filter(|v| self.arcs.contains_key(&(relay, *v)))
                .collect();

            for &from in &predecessors {
                for &to in &successors {
                    let (head, tail) = match (self.arcs.get(&(from, relay)), self.arcs.get(&(relay, to))) {
                        (Some(head), Some(tail)) => (head, tail),
                        _ => continue,
                    };
                    let through = head.base_weight + tail.base_weight;
                    let shorter = self
                        .arcs
                        .get(&(from, to))
                        .map_or(true, |direct| through < direct.base_weight);
                    if !shorter {
                        continue;
                    }

                    let merged = merge_edits(&head.edit, &tail.edit);
                    if merged.unchanged_words > max_unchanged_words {
                        continue;
                    }
                    trace!("add transitive arc {} -> {}: {}{}", from, to, merged.kind.as_str(), merged);
                    self.upsert((from, to), merged, through);
                }
            }
        }

        self.prune_gapped_noops();
    }

    /// Removes no-op edges that took more than one hop to build, so the path
    /// search walks the identity alignment token by token.
    fn prune_gapped_noops(&mut self) {
        let (kept, dropped): (Vec<_>, Vec<_>) = self.edges.iter().copied().partition(|key| {
            self.arcs
                .get(key)
                .map_or(false, |arc| !(arc.edit.is_noop() && arc.base_weight > UNIT_WEIGHT))
        });

        for key in &dropped {
            trace!("remove noop arc {} -> {}", key.0, key.1);
            self.arcs.remove(key);
        }
        self.edges = kept;
    }
}
