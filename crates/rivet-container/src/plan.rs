//! Static dependency planning using `petgraph`.
//!
//! Walks the descriptors reachable from a root type without constructing
//! anything, so that bindings and catalogs can be checked up front.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use rivet_common::error::{Result, RivetError};
use rivet_common::types::TypeName;
use rivet_config::BindingRegistry;

use crate::catalog::TypeCatalog;
use crate::descriptor::{FieldKind, ParamDescriptor};

/// Dependency graph of the concrete types reachable from a root.
///
/// Edges point from a dependency to its dependent so that a topological
/// sort yields dependencies first.
#[derive(Debug)]
pub struct DependencyPlan {
    graph: DiGraph<TypeName, ()>,
    nodes: HashMap<TypeName, NodeIndex>,
    unresolved: Vec<TypeName>,
}

impl DependencyPlan {
    /// Builds the plan for `root` under the given bindings.
    ///
    /// Only the constructor that would be selected at construction time
    /// contributes edges, together with every injected field. Types without
    /// a descriptor or without a usable constructor are recorded as
    /// unresolved.
    #[must_use]
    pub fn build(catalog: &TypeCatalog, bindings: &BindingRegistry, root: &TypeName) -> Self {
        let mut plan = Self {
            graph: DiGraph::new(),
            nodes: HashMap::new(),
            unresolved: Vec::new(),
        };
        let root = bindings.resolve(root).clone();
        let _ = plan.node(&root);
        let mut queue = VecDeque::from([root]);
        let mut seen = HashSet::new();

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            let Some((descriptor, constructor)) = catalog
                .descriptor(current.as_str())
                .and_then(|d| d.select_constructor().ok().map(|c| (d, c)))
            else {
                plan.unresolved.push(current);
                continue;
            };

            let params = constructor.params().iter().filter_map(|p| match p {
                ParamDescriptor::Dependency(name) => Some(name),
                ParamDescriptor::Value { .. } => None,
            });
            let fields = descriptor.fields().iter().filter_map(|f| match f.kind() {
                FieldKind::Inject(name) => Some(name),
                FieldKind::Value { .. } => None,
            });
            let dependent = plan.node(&current);
            for dependency in params.chain(fields) {
                let concrete = bindings.resolve(dependency);
                let index = plan.node(concrete);
                let _ = plan.graph.add_edge(index, dependent, ());
                queue.push_back(concrete.clone());
            }
        }

        plan.unresolved.sort_unstable();
        tracing::debug!(
            types = plan.graph.node_count(),
            edges = plan.graph.edge_count(),
            unresolved = plan.unresolved.len(),
            "dependency plan built"
        );
        plan
    }

    fn node(&mut self, name: &TypeName) -> NodeIndex {
        if let Some(&index) = self.nodes.get(name) {
            return index;
        }
        let index = self.graph.add_node(name.clone());
        let _ = self.nodes.insert(name.clone(), index);
        index
    }

    /// Number of distinct concrete types in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns `true` if the plan holds no types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Types that are reachable but cannot be constructed, sorted by name.
    #[must_use]
    pub fn unresolved(&self) -> &[TypeName] {
        &self.unresolved
    }

    /// Direct dependencies of `name`, sorted by name.
    #[must_use]
    pub fn dependencies_of(&self, name: &str) -> Vec<&TypeName> {
        let Some(&index) = self.nodes.get(name) else {
            return Vec::new();
        };
        let mut deps: Vec<&TypeName> = self
            .graph
            .neighbors_directed(index, Direction::Incoming)
            .filter_map(|n| self.graph.node_weight(n))
            .collect();
        deps.sort_unstable();
        deps.dedup();
        deps
    }

    /// Returns the construction order, dependencies first.
    ///
    /// # Errors
    ///
    /// Returns `CyclicDependency` naming one cycle if the graph has any.
    pub fn order(&self) -> Result<Vec<TypeName>> {
        match petgraph::algo::toposort(&self.graph, None) {
            Ok(indices) => Ok(indices
                .iter()
                .filter_map(|&idx| self.graph.node_weight(idx).cloned())
                .collect()),
            Err(cycle) => Err(RivetError::CyclicDependency {
                chain: self.cycle_through(cycle.node_id()),
            }),
        }
    }

    /// Follows dependency edges from `start` back to itself.
    fn cycle_through(&self, start: NodeIndex) -> Vec<String> {
        let mut path = vec![start];
        let mut visited = HashSet::from([start]);
        if !self.walk_back(start, start, &mut path, &mut visited) {
            path.truncate(1);
        }
        path.iter()
            .filter_map(|&idx| self.graph.node_weight(idx))
            .map(ToString::to_string)
            .collect()
    }

    fn walk_back(
        &self,
        start: NodeIndex,
        current: NodeIndex,
        path: &mut Vec<NodeIndex>,
        visited: &mut HashSet<NodeIndex>,
    ) -> bool {
        for next in self.graph.neighbors_directed(current, Direction::Incoming) {
            if next == start {
                path.push(start);
                return true;
            }
            if visited.insert(next) {
                path.push(next);
                if self.walk_back(start, next, path, visited) {
                    return true;
                }
                let _ = path.pop();
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use rivet_coerce::ValueDirective;

    use super::*;
    use crate::descriptor::TypeDescriptor;

    #[derive(Default)]
    struct Unit;

    fn depends_on(name: &str, deps: &[&str]) -> TypeDescriptor {
        let params = deps.iter().map(|d| ParamDescriptor::dependency(*d)).collect();
        TypeDescriptor::of::<Unit>(name)
            .inject_constructor(params, |_| Ok(Unit))
            .build()
    }

    fn names(order: &[TypeName]) -> Vec<&str> {
        order.iter().map(TypeName::as_str).collect()
    }

    #[test]
    fn single_type() {
        let catalog = TypeCatalog::new().with(depends_on("a.Leaf", &[]));
        let plan = DependencyPlan::build(&catalog, &BindingRegistry::new(), &"a.Leaf".into());
        assert_eq!(names(&plan.order().expect("order")), vec!["a.Leaf"]);
        assert!(plan.unresolved().is_empty());
    }

    #[test]
    fn dependencies_come_first() {
        let catalog = TypeCatalog::new()
            .with(depends_on("a.Car", &["a.Engine", "a.Wheel"]))
            .with(depends_on("a.Engine", &["a.Piston"]))
            .with(depends_on("a.Wheel", &[]))
            .with(depends_on("a.Piston", &[]));
        let plan = DependencyPlan::build(&catalog, &BindingRegistry::new(), &"a.Car".into());
        let order = plan.order().expect("order");
        let pos = |name: &str| order.iter().position(|n| n.as_str() == name).expect(name);
        assert_eq!(order.len(), 4);
        assert!(pos("a.Piston") < pos("a.Engine"));
        assert!(pos("a.Engine") < pos("a.Car"));
        assert!(pos("a.Wheel") < pos("a.Car"));
        assert_eq!(
            plan.dependencies_of("a.Car"),
            vec![&TypeName::new("a.Engine"), &TypeName::new("a.Wheel")]
        );
    }

    #[test]
    fn bindings_are_followed() {
        let catalog = TypeCatalog::new()
            .with_abstract("a.Engine")
            .with(depends_on("a.Car", &["a.Engine"]))
            .with(depends_on("a.V8", &[]));
        let bindings = BindingRegistry::from_entries([("a.Engine", "a.V8")]).expect("bindings");
        let plan = DependencyPlan::build(&catalog, &bindings, &"a.Car".into());
        assert_eq!(names(&plan.order().expect("order")), vec!["a.V8", "a.Car"]);
    }

    #[test]
    fn unresolved_types_are_listed() {
        let catalog = TypeCatalog::new()
            .with_abstract("a.Engine")
            .with(depends_on("a.Car", &["a.Engine", "a.Radio"]));
        let plan = DependencyPlan::build(&catalog, &BindingRegistry::new(), &"a.Car".into());
        assert_eq!(names(plan.unresolved()), vec!["a.Engine", "a.Radio"]);
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn injected_fields_add_edges() {
        let catalog = TypeCatalog::new()
            .with(
                TypeDescriptor::of::<Unit>("a.Car")
                    .default_constructor()
                    .inject_field("radio", "a.Radio", |_: &mut Unit, _: Unit| {})
                    .value_field("seats", ValueDirective::new("4"), |_: &mut Unit, _: i32| {})
                    .build(),
            )
            .with(depends_on("a.Radio", &[]));
        let plan = DependencyPlan::build(&catalog, &BindingRegistry::new(), &"a.Car".into());
        assert_eq!(names(&plan.order().expect("order")), vec!["a.Radio", "a.Car"]);
    }

    #[test]
    fn cycle_is_reported_with_its_chain() {
        let catalog = TypeCatalog::new()
            .with(depends_on("a.Chicken", &["a.Egg"]))
            .with(depends_on("a.Egg", &["a.Chicken"]));
        let plan = DependencyPlan::build(&catalog, &BindingRegistry::new(), &"a.Chicken".into());
        let err = plan.order().unwrap_err();
        match err {
            RivetError::CyclicDependency { chain } => {
                assert_eq!(chain.len(), 3);
                assert_eq!(chain.first(), chain.last());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let catalog = TypeCatalog::new().with(depends_on("a.Ouroboros", &["a.Ouroboros"]));
        let plan = DependencyPlan::build(&catalog, &BindingRegistry::new(), &"a.Ouroboros".into());
        let err = plan.order().unwrap_err();
        assert_eq!(
            err.to_string(),
            "cyclic dependency detected: a.Ouroboros -> a.Ouroboros"
        );
    }
}
