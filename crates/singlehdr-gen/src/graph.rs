//! Fragment pools and dependency ordering
//!
//! Each visibility gets its own pool. A pool is ordered by building a
//! dependency graph over its members and peeling it layer by layer: every
//! round emits the files whose dependencies have all been emitted, sorted
//! lexically, which keeps the output stable across runs.

use singlehdr_core::{Error, FileId, Result, SourceFragment, Visibility};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Fragments of one visibility, keyed by identity
#[derive(Debug, Clone)]
pub struct FragmentPool {
    visibility: Visibility,
    fragments: BTreeMap<FileId, SourceFragment>,
}

impl FragmentPool {
    pub fn new(visibility: Visibility) -> Self {
        Self {
            visibility,
            fragments: BTreeMap::new(),
        }
    }

    /// Add a fragment, returning the one it replaces
    pub fn insert(&mut self, fragment: SourceFragment) -> Option<SourceFragment> {
        self.fragments.insert(fragment.id().clone(), fragment)
    }

    pub fn get(&self, id: &FileId) -> Option<&SourceFragment> {
        self.fragments.get(id)
    }

    pub fn contains(&self, id: &FileId) -> bool {
        self.fragments.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Dependency graph over the members of one pool
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    visibility: Visibility,
    edges: BTreeMap<FileId, BTreeSet<FileId>>,
}

impl DependencyGraph {
    /// Build the graph of `pool`
    ///
    /// Dependencies on files outside the pool, on files present in
    /// `satisfied_by`, and on the file itself produce no edge.
    pub fn from_pool(pool: &FragmentPool, satisfied_by: Option<&FragmentPool>) -> Self {
        let edges: BTreeMap<FileId, BTreeSet<FileId>> = pool
            .fragments
            .iter()
            .map(|(id, fragment)| {
                let deps: BTreeSet<FileId> = fragment
                    .dependencies()
                    .iter()
                    .filter(|dep| *dep != id && pool.contains(dep))
                    .filter(|dep| !satisfied_by.map_or(false, |other| other.contains(dep)))
                    .cloned()
                    .collect();
                (id.clone(), deps)
            })
            .collect();

        Self {
            visibility: pool.visibility,
            edges,
        }
    }

    /// Edges leaving `id`
    pub fn dependencies(&self, id: &FileId) -> Option<&BTreeSet<FileId>> {
        self.edges.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Groups of mutually independent files, dependencies first
    pub fn layers(&self) -> Result<Vec<Vec<FileId>>> {
        let mut remaining: BTreeMap<&FileId, BTreeSet<&FileId>> = self
            .edges
            .iter()
            .map(|(id, deps)| (id, deps.iter().collect()))
            .collect();

        let mut layers = Vec::new();

        while !remaining.is_empty() {
            let ready: Vec<&FileId> = remaining
                .iter()
                .filter(|(_, deps)| deps.is_empty())
                .map(|(id, _)| *id)
                .collect();

            if ready.is_empty() {
                let files = Self::find_cycle(&remaining);
                return Err(Error::DependencyCycle {
                    visibility: self.visibility,
                    files,
                });
            }

            for id in &ready {
                remaining.remove(*id);
            }
            for deps in remaining.values_mut() {
                for id in &ready {
                    deps.remove(*id);
                }
            }

            debug!(
                "{} layer {}: {} file(s)",
                self.visibility,
                layers.len() + 1,
                ready.len()
            );
            layers.push(ready.into_iter().cloned().collect());
        }

        Ok(layers)
    }

    /// Topological order of the whole pool
    pub fn order(&self) -> Result<Vec<FileId>> {
        Ok(self.layers()?.into_iter().flatten().collect())
    }

    /// One concrete cycle among nodes that could not be emitted
    ///
    /// Every remaining node still has a remaining dependency, so following
    /// the smallest one from any node must eventually revisit a node.
    fn find_cycle(remaining: &BTreeMap<&FileId, BTreeSet<&FileId>>) -> Vec<String> {
        let mut path: Vec<&FileId> = Vec::new();
        let mut seen: HashMap<&FileId, usize> = HashMap::new();
        let mut current = remaining.keys().next().copied();

        while let Some(id) = current {
            if let Some(&start) = seen.get(id) {
                let mut cycle: Vec<String> =
                    path[start..].iter().map(|id| id.to_string()).collect();
                cycle.push(id.to_string());
                return cycle;
            }
            seen.insert(id, path.len());
            path.push(id);
            current = remaining
                .get(id)
                .and_then(|deps| deps.iter().next().copied());
        }

        path.iter().map(|id| id.to_string()).collect()
    }
}
