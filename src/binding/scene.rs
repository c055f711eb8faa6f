//! Scene: a mounted component tree wired to its stores.
//!
//! Mounting instantiates the root component (and every registered component
//! it references), binds each placeholder prop with [`Store::run_tracked`],
//! then runs the first cascade and layout pass. Afterwards any store write
//! that a placeholder read re-evaluates that prop and refreshes the scene:
//! cascade for every scope, intrinsic sizing, then a full-tree layout.
//!
//! ```ignore
//! let registry = ComponentRegistry::from_json(&components)?;
//! let scene = Scene::builder(registry)
//!     .with_config(SceneConfig::new().with_viewport(Size::new(800.0, 600.0)))
//!     .mount()?;
//! let title = scene.find_by_id("title").unwrap();
//! scene.data(ScopeId(0)).unwrap().set("title", "renamed");
//! println!("{:?}", scene.layout_box(title));
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::Deserialize;

use crate::binding::component::{ComponentDefinition, ComponentRegistry};
use crate::binding::groups::BindingGroups;
use crate::binding::placeholder::{substitute, PathEvaluator, Placeholder, PlaceholderEvaluator};
use crate::css::computed::ComputedStyle;
use crate::css::properties::format_length;
use crate::css::stylesheet::{RuleError, Stylesheet};
use crate::dom::node::{NodeId, ScopeId};
use crate::dom::template::TreeError;
use crate::dom::tree::Dom;
use crate::geometry::{LayoutBox, Size};
use crate::layout::engine::LayoutEngine;
use crate::reactive::{Observable, Store, SubscriberId, Trigger, Value};
use crate::widget::kind::WidgetKind;
use crate::widget::measure::{DefaultMetrics, IntrinsicSize};

// ---------------------------------------------------------------------------
// SceneConfig
// ---------------------------------------------------------------------------

/// Configuration for a scene.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Host surface size. Overrides the root's `width`/`height` when set.
    pub viewport: Option<Size>,
    /// Refresh cascade and layout after a bound prop changes.
    pub relayout_on_change: bool,
    /// Deepest allowed nesting of component instances.
    pub max_component_depth: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            viewport: None,
            relayout_on_change: true,
            max_component_depth: 16,
        }
    }
}

impl SceneConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the viewport size (builder).
    pub fn with_viewport(mut self, viewport: Size) -> Self {
        self.viewport = Some(viewport);
        self
    }

    /// Set whether bound changes refresh the scene (builder).
    pub fn with_relayout_on_change(mut self, relayout: bool) -> Self {
        self.relayout_on_change = relayout;
        self
    }

    /// Set the component nesting limit (builder).
    pub fn with_max_component_depth(mut self, depth: usize) -> Self {
        self.max_component_depth = depth;
        self
    }
}

// ---------------------------------------------------------------------------
// SceneError
// ---------------------------------------------------------------------------

/// Errors from mounting a scene or writing user input through it.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("no component named `{0}` is registered")]
    UnknownComponent(String),

    #[error("component `{name}` nested {depth} levels deep exceeds the limit")]
    ComponentDepth { name: String, depth: usize },

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("node is not part of this scene")]
    UnknownNode,

    #[error("`{tag}` has no bound `value` prop")]
    Unbound { tag: String },

    #[error("`{tag}` does not belong to a binding group")]
    NotGrouped { tag: String },

    #[error("bound path `{0}` does not resolve to a writable property")]
    BindPath(String),
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

/// One mounted component instance.
struct Scope {
    component: String,
    stylesheet: Stylesheet,
    store: Store,
    data: Observable,
}

/// A placeholder prop waiting to be bound.
#[derive(Debug, Clone)]
struct Binding {
    node: NodeId,
    scope: ScopeId,
    prop: String,
    raw: String,
}

struct SceneState {
    dom: Dom,
    root: NodeId,
    scopes: Vec<Scope>,
    engine: LayoutEngine,
    groups: BindingGroups,
    measure: Rc<dyn IntrinsicSize>,
    evaluator: Rc<dyn PlaceholderEvaluator>,
    config: SceneConfig,
    rule_errors: Vec<RuleError>,
}

impl SceneState {
    /// Build an instance of component `name` as a detached subtree and
    /// replace any registered component tags inside it with their own
    /// instances.
    fn instantiate(
        &mut self,
        registry: &ComponentRegistry,
        name: &str,
        depth: usize,
    ) -> Result<NodeId, SceneError> {
        if depth > self.config.max_component_depth {
            return Err(SceneError::ComponentDepth {
                name: name.to_string(),
                depth,
            });
        }
        let definition = registry
            .get(name)
            .ok_or_else(|| SceneError::UnknownComponent(name.to_string()))?;

        let scope = ScopeId(self.scopes.len());
        let (stylesheet, errors) = Stylesheet::load(&definition.style);
        self.rule_errors.extend(errors);
        let store = Store::new();
        let data = store.import_root(&definition.script.data);
        self.scopes.push(Scope {
            component: name.to_string(),
            stylesheet,
            store,
            data,
        });

        let mut root = self.dom.build(&definition.template, scope)?;
        if let Some(node) = self.dom.get_mut(root) {
            node.boundary = true;
        }
        tracing::debug!(component = name, ?scope, depth, "component instantiated");

        let nested: Vec<(NodeId, String)> = self
            .dom
            .walk_depth_first(root)
            .into_iter()
            .filter_map(|id| match &self.dom.get(id)?.kind {
                WidgetKind::Custom(tag) if registry.contains(tag) => Some((id, tag.clone())),
                _ => None,
            })
            .collect();
        for (id, tag) in nested {
            // Gone if an outer component tag was already replaced.
            if !self.dom.contains(id) {
                continue;
            }
            let instance = self.instantiate(registry, &tag, depth + 1)?;
            self.dom.replace(id, instance);
            if id == root {
                root = instance;
            }
        }
        Ok(root)
    }

    /// Every prop under `root` whose raw value holds a placeholder.
    fn collect_bindings(&self, root: NodeId) -> Vec<Binding> {
        let mut bindings = Vec::new();
        for id in self.dom.walk_depth_first(root) {
            let Some(node) = self.dom.get(id) else {
                continue;
            };
            for (prop, raw) in &node.raw_props {
                if Placeholder::parse(raw).is_some() {
                    bindings.push(Binding {
                        node: id,
                        scope: node.scope,
                        prop: prop.clone(),
                        raw: raw.clone(),
                    });
                }
            }
        }
        bindings
    }

    /// Store a freshly evaluated prop and keep the two-way state in sync.
    fn apply_binding(&mut self, binding: &Binding, expr: &str, value: Value) {
        let Some(node) = self.dom.get_mut(binding.node) else {
            return;
        };
        node.set_prop(&binding.prop, value);
        if binding.prop != "value" {
            return;
        }
        if node.kind.binds_two_way() {
            node.bind = Some(expr.to_string());
        }
        if node.kind.forms_group() {
            self.groups.register(binding.scope, expr, binding.node);
        }
    }

    /// Cascade every scope, measure, then lay out the whole tree.
    fn refresh(&mut self) {
        let _span = tracing::debug_span!("refresh").entered();
        let order = self.dom.walk_depth_first(self.root);

        for &id in &order {
            let Some(scope) = self.dom.get(id).map(|node| node.scope) else {
                continue;
            };
            if let Some(entry) = self.scopes.get(scope.0) {
                entry.stylesheet.resolve(id, &mut self.dom);
            }
        }

        for &id in &order {
            let Some(node) = self.dom.get_mut(id) else {
                continue;
            };
            if let Some(size) = self.measure.intrinsic_size(node) {
                node.style.set_inline("width", &format_length(size.width));
                node.style.set_inline("height", &format_length(size.height));
            }
        }

        if let Some(viewport) = self.config.viewport {
            if let Some(root) = self.dom.get_mut(self.root) {
                root.style.set_inline("width", &format_length(viewport.width));
                root.style.set_inline("height", &format_length(viewport.height));
            }
        }

        self.engine.compute(&mut self.dom, self.root);
    }
}

/// Bind one placeholder prop to the store of its scope.
///
/// The callback only holds a weak handle to the scene and never keeps a
/// borrow of it while the evaluator reads the store.
fn bind(state: &Rc<RefCell<SceneState>>, binding: Binding) -> Option<(Store, SubscriberId)> {
    let store = state.borrow().scopes.get(binding.scope.0)?.store.clone();
    let weak: Weak<RefCell<SceneState>> = Rc::downgrade(state);
    tracing::debug!(node = ?binding.node, prop = %binding.prop, raw = %binding.raw, "binding prop");

    let sid = store.run_tracked(move |trigger| {
        let Some(state) = weak.upgrade() else {
            return;
        };
        let Some(placeholder) = Placeholder::parse(&binding.raw) else {
            return;
        };
        let (data, evaluator) = match state.try_borrow() {
            Ok(st) => match st.scopes.get(binding.scope.0) {
                Some(scope) => (scope.data.clone(), Rc::clone(&st.evaluator)),
                None => return,
            },
            Err(_) => {
                tracing::warn!(prop = %binding.prop, "scene busy, binding update skipped");
                return;
            }
        };
        let value = substitute(&binding.raw, &placeholder, &*evaluator, &data);

        let Ok(mut st) = state.try_borrow_mut() else {
            tracing::warn!(prop = %binding.prop, "scene busy, binding update skipped");
            return;
        };
        st.apply_binding(&binding, placeholder.expr, value);
        if trigger == Trigger::Change && st.config.relayout_on_change {
            tracing::debug!(node = ?binding.node, prop = %binding.prop, "bound prop changed, relayout");
            st.refresh();
        }
    });
    Some((store, sid))
}

// ---------------------------------------------------------------------------
// SceneBuilder
// ---------------------------------------------------------------------------

/// Collects the collaborators of a scene before mounting it.
pub struct SceneBuilder {
    registry: ComponentRegistry,
    root: String,
    measure: Rc<dyn IntrinsicSize>,
    evaluator: Rc<dyn PlaceholderEvaluator>,
    config: SceneConfig,
}

impl SceneBuilder {
    /// Builder mounting the `main` component of `registry` with the default
    /// metrics and path evaluator.
    pub fn new(registry: ComponentRegistry) -> Self {
        Self {
            registry,
            root: "main".to_string(),
            measure: Rc::new(DefaultMetrics::default()),
            evaluator: Rc::new(PathEvaluator),
            config: SceneConfig::default(),
        }
    }

    /// Mount `name` instead of `main`.
    pub fn with_root(mut self, name: impl Into<String>) -> Self {
        self.root = name.into();
        self
    }

    /// Register another component.
    pub fn with_component(
        mut self,
        name: impl Into<String>,
        definition: ComponentDefinition,
    ) -> Self {
        self.registry.insert(name, definition);
        self
    }

    /// Use `measure` for intrinsic sizes.
    pub fn with_measure(mut self, measure: impl IntrinsicSize + 'static) -> Self {
        self.measure = Rc::new(measure);
        self
    }

    /// Use `evaluator` for placeholder expressions.
    pub fn with_evaluator(mut self, evaluator: impl PlaceholderEvaluator + 'static) -> Self {
        self.evaluator = Rc::new(evaluator);
        self
    }

    pub fn with_config(mut self, config: SceneConfig) -> Self {
        self.config = config;
        self
    }

    /// Instantiate the root component, bind its placeholders and run the
    /// first pass.
    pub fn mount(self) -> Result<Scene, SceneError> {
        let SceneBuilder {
            registry,
            root: root_name,
            measure,
            evaluator,
            config,
        } = self;
        let _span = tracing::debug_span!("mount", component = %root_name).entered();

        let mut state = SceneState {
            dom: Dom::new(),
            root: NodeId::default(),
            scopes: Vec::new(),
            engine: LayoutEngine::new(),
            groups: BindingGroups::new(),
            measure,
            evaluator,
            config,
            rule_errors: Vec::new(),
        };
        let root = state.instantiate(&registry, &root_name, 0)?;
        state.dom.set_root(root);
        state.root = root;
        let bindings = state.collect_bindings(root);

        let state = Rc::new(RefCell::new(state));
        let subscriptions: Vec<(Store, SubscriberId)> = bindings
            .into_iter()
            .filter_map(|binding| bind(&state, binding))
            .collect();
        tracing::debug!(bindings = subscriptions.len(), "scene mounted");

        state.borrow_mut().refresh();
        Ok(Scene {
            state,
            subscriptions,
        })
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// A mounted, reactive widget tree.
///
/// Dropping the scene disposes every binding it registered.
pub struct Scene {
    state: Rc<RefCell<SceneState>>,
    subscriptions: Vec<(Store, SubscriberId)>,
}

impl Scene {
    pub fn builder(registry: ComponentRegistry) -> SceneBuilder {
        SceneBuilder::new(registry)
    }

    pub fn root(&self) -> NodeId {
        self.state.borrow().root
    }

    /// Root data of a component instance. Scope 0 is the mounted root.
    pub fn data(&self, scope: ScopeId) -> Option<Observable> {
        self.state
            .borrow()
            .scopes
            .get(scope.0)
            .map(|entry| entry.data.clone())
    }

    /// Component name of each scope, by scope index.
    pub fn scopes(&self) -> Vec<String> {
        self.state
            .borrow()
            .scopes
            .iter()
            .map(|scope| scope.component.clone())
            .collect()
    }

    /// Number of live placeholder bindings.
    pub fn binding_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Rules rejected while loading component styles.
    pub fn rule_errors(&self) -> Vec<String> {
        self.state
            .borrow()
            .rule_errors
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Re-run cascade, measurement and layout.
    pub fn relayout(&self) {
        self.state.borrow_mut().refresh();
    }

    /// Layout passes run so far.
    pub fn layout_passes(&self) -> u64 {
        self.state.borrow().engine.passes()
    }

    pub fn layout_box(&self, node: NodeId) -> Option<LayoutBox> {
        self.state.borrow().dom.get(node).map(|data| data.layout)
    }

    pub fn computed_style(&self, node: NodeId) -> Option<ComputedStyle> {
        self.state.borrow().dom.get(node).map(|data| data.style.clone())
    }

    /// Resolved prop of `node`.
    pub fn prop(&self, node: NodeId, name: &str) -> Option<Value> {
        self.state.borrow().dom.get(node)?.prop(name).cloned()
    }

    /// Scope `node` belongs to.
    pub fn scope_of(&self, node: NodeId) -> Option<ScopeId> {
        self.state.borrow().dom.get(node).map(|data| data.scope)
    }

    /// First node in document order whose `id` prop is `id`.
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.state.borrow().dom.query_by_id(id)
    }

    /// Deepest node whose box contains the point.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<NodeId> {
        self.state.borrow().dom.hit_test(x, y)
    }

    /// Read access to the tree.
    ///
    /// Store writes made from inside `f` cannot refresh the scene.
    pub fn with_dom<R>(&self, f: impl FnOnce(&Dom) -> R) -> R {
        f(&self.state.borrow().dom)
    }

    /// Write user input on `node` back through its bound `value` path.
    pub fn commit_input(&self, node: NodeId, value: impl Into<Value>) -> Result<(), SceneError> {
        let (data, path) = {
            let st = self.state.borrow();
            let data = st.dom.get(node).ok_or(SceneError::UnknownNode)?;
            let path = data.bind.clone().ok_or_else(|| SceneError::Unbound {
                tag: data.tag.clone(),
            })?;
            let scope = st.scopes.get(data.scope.0).ok_or(SceneError::UnknownNode)?;
            (scope.data.clone(), path)
        };
        tracing::debug!(?node, path = %path, "committing input");
        if data.set_path(&path, value) {
            Ok(())
        } else {
            Err(SceneError::BindPath(path))
        }
    }

    /// Select a group member: write its `option` prop to the group's path.
    pub fn select_option(&self, node: NodeId) -> Result<(), SceneError> {
        let option = {
            let st = self.state.borrow();
            let data = st.dom.get(node).ok_or(SceneError::UnknownNode)?;
            if st.groups.group_of(node).is_none() {
                return Err(SceneError::NotGrouped {
                    tag: data.tag.clone(),
                });
            }
            data.prop("option").cloned().unwrap_or(Value::Null)
        };
        self.commit_input(node, option)
    }

    /// Members of the group bound to `path` in `scope`.
    pub fn group_members(&self, scope: ScopeId, path: &str) -> Vec<NodeId> {
        self.state.borrow().groups.members(scope, path).to_vec()
    }

    /// Whether a group member's current value equals its option.
    pub fn is_selected(&self, node: NodeId) -> bool {
        let st = self.state.borrow();
        let Some(data) = st.dom.get(node) else {
            return false;
        };
        match (data.prop("value"), data.prop("option")) {
            (Some(value), Some(option)) => value.to_string() == option.to_string(),
            _ => false,
        }
    }

    /// The selected member of the group bound to `path` in `scope`.
    pub fn selected_in_group(&self, scope: ScopeId, path: &str) -> Option<NodeId> {
        self.group_members(scope, path)
            .into_iter()
            .find(|&node| self.is_selected(node))
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        for (store, sid) in self.subscriptions.drain(..) {
            store.dispose(sid);
        }
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let st = self.state.borrow();
        f.debug_struct("Scene")
            .field("nodes", &st.dom.len())
            .field("scopes", &st.scopes.len())
            .field("bindings", &self.subscriptions.len())
            .finish()
    }
}
