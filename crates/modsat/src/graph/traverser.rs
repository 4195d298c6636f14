use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use log::trace;
use modsat_version::{ModuleId, ModuleIdQuery};

use super::ModuleGraphListener;
use crate::catalog::Catalog;
use crate::config::ResolverConfig;
use crate::error::TraversalError;
use crate::module::{ModuleInfo, ModuleViewRef, ViewDependence};

/// A pending step of the walk
#[derive(Debug)]
enum Node {
    /// Match a root query against the catalog
    Query { depth: usize, query: ModuleIdQuery },
    /// Visit a module reached from a root query
    Module {
        depth: usize,
        query: ModuleIdQuery,
        id: ModuleId,
    },
    /// Match a declared dependence of `requiring`
    ViewDependence {
        depth: usize,
        requiring: Arc<ModuleInfo>,
        dependence: ViewDependence,
    },
    /// Visit a module reached through a dependence of `requiring`
    ModuleWithViewDependence {
        depth: usize,
        requiring: Arc<ModuleInfo>,
        dependence: ViewDependence,
        id: ModuleId,
    },
}

impl Node {
    fn depth(&self) -> usize {
        match self {
            Node::Query { depth, .. }
            | Node::Module { depth, .. }
            | Node::ViewDependence { depth, .. }
            | Node::ModuleWithViewDependence { depth, .. } => *depth,
        }
    }
}

/// Walk state owned by a single traversal
struct State<'l> {
    listener: &'l mut dyn ModuleGraphListener,
    visited: HashSet<ModuleId>,
    stack: VecDeque<Node>,
}

impl State<'_> {
    fn push(&mut self, node: Node) {
        self.stack.push_front(node);
    }

    fn pop(&mut self) -> Option<Node> {
        self.stack.pop_front()
    }

    /// Mark a module visited, returning true if it already was
    fn is_visited(&mut self, info: &ModuleInfo) -> bool {
        !self.visited.insert(info.id().clone())
    }
}

/// Depth first walk of the module dependency graph.
///
/// The walk uses an explicit stack. Roots are taken in declaration order
/// and dependences of a module are expanded in declaration order, the
/// first time the module is reached.
pub struct ModuleGraphTraverser<'a> {
    catalog: &'a dyn Catalog,
    base_module: String,
    trace: bool,
}

impl<'a> ModuleGraphTraverser<'a> {
    pub fn new(catalog: &'a dyn Catalog, config: &ResolverConfig) -> Self {
        Self {
            catalog,
            base_module: config.base_module.clone(),
            trace: config.trace,
        }
    }

    pub fn traverse(
        &self,
        listener: &mut dyn ModuleGraphListener,
        roots: &[ModuleIdQuery],
    ) -> Result<(), TraversalError> {
        let mut state = State {
            listener,
            visited: HashSet::new(),
            stack: VecDeque::new(),
        };

        for query in roots {
            state.stack.push_back(Node::Query {
                depth: 0,
                query: query.clone(),
            });
        }

        while let Some(node) = state.pop() {
            self.process(&mut state, node)?;
        }

        Ok(())
    }

    fn process(&self, state: &mut State<'_>, node: Node) -> Result<(), TraversalError> {
        let depth = node.depth();
        match node {
            Node::Query { depth, query } => {
                self.log(depth, &query);
                state.listener.on_root_dependence(depth, &query);

                for id in self.matching_ids(&query)? {
                    state.push(Node::Module {
                        depth: depth + 1,
                        query: query.clone(),
                        id,
                    });
                }
            }
            Node::ViewDependence {
                depth,
                requiring,
                dependence,
            } => {
                self.log(depth, &dependence);
                state.listener.on_view_dependence(depth, &requiring, &dependence);

                for id in self.matching_ids(dependence.query())? {
                    state.push(Node::ModuleWithViewDependence {
                        depth: depth + 1,
                        requiring: Arc::clone(&requiring),
                        dependence: dependence.clone(),
                        id,
                    });
                }
            }
            Node::Module { query, id, .. } => {
                let view = self.read_view(&id)?;
                state
                    .listener
                    .on_matching_root_dependence(depth, &query, &id, &view);
                self.expand(state, depth, &id, view.module());
            }
            Node::ModuleWithViewDependence {
                requiring,
                dependence,
                id,
                ..
            } => {
                let view = self.read_view(&id)?;
                state
                    .listener
                    .on_matching_view_dependence(depth, &requiring, &dependence, &id, &view);
                self.expand(state, depth, &id, view.module());
            }
        }

        Ok(())
    }

    /// Push the dependences of a module unless it was already expanded
    fn expand(&self, state: &mut State<'_>, depth: usize, id: &ModuleId, info: &Arc<ModuleInfo>) {
        if state.is_visited(info) {
            self.log(depth, format_args!("{} -> module {} VISITED", id, info.id()));
            return;
        }

        if self.trace {
            self.log(depth, format_args!("{} -> module {}", id, info.id()));
            for view in info.views() {
                let mut line = format!("-> view {}", view.id());
                for alias in view.aliases() {
                    line.push_str(&format!(" -> alias {}", alias));
                }
                self.log(depth, line);
            }
        }

        for dependence in info.requires().iter().rev() {
            state.push(Node::ViewDependence {
                depth: depth + 1,
                requiring: Arc::clone(info),
                dependence: dependence.clone(),
            });
        }
    }

    /// Ids matching a query, ascending by version
    fn matching_ids(&self, query: &ModuleIdQuery) -> Result<Vec<ModuleId>, TraversalError> {
        let name = query.name();
        let mut ids = self
            .catalog
            .ids_for_name(name)
            .map_err(|source| TraversalError::Lookup {
                name: name.to_string(),
                source,
            })?;
        ids.sort();

        let any_version = name == self.base_module;
        ids.retain(|id| any_version || query.matches(id));
        Ok(ids)
    }

    fn read_view(&self, id: &ModuleId) -> Result<ModuleViewRef, TraversalError> {
        let info = self
            .catalog
            .info_for(id)
            .map_err(|source| TraversalError::ReadModule {
                id: id.clone(),
                source,
            })?;
        let module = info.id().clone();
        ModuleViewRef::for_id(info, id).ok_or_else(|| TraversalError::MissingView {
            id: id.clone(),
            module,
        })
    }

    fn log(&self, depth: usize, message: impl std::fmt::Display) {
        if self.trace {
            trace!("{:width$}{}", "", message, width = depth);
        }
    }
}
