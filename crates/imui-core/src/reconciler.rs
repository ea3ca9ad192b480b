use std::fmt;
use std::sync::Arc;

use crossbeam_channel::bounded;
use log::{debug, trace, warn};

use crate::invalidate::{destroy_containers, prune_widgets};
use crate::registry::ControlEntry;
use crate::widget::snapshot;
use crate::{
    Applier, Axis, ContainerNode, ControlId, ControlRegistry, DefaultStyle, ExecutorHandle,
    FactoryRegistry, FrameController, FramePhase, FrameStats, LayoutScope, LayoutStack, NodeError,
    NodeId, ReconcileError, ReconcilerConfig, StateKey, StateValue, Style, StyleProps, Widget,
    WidgetArgs, WidgetFactory, WidgetKind, WidgetResponse,
};

/// Drives immediate-mode widget calls against a retained tree.
///
/// Each frame is bracketed by [`begin_frame`](Self::begin_frame) and
/// [`end_frame`](Self::end_frame). Every call in between gets the next
/// positional [`ControlId`]; the instance stored at that id is reused when it
/// has the requested kind and sits in the current layout container, otherwise
/// everything from that id on is invalidated and a fresh instance is built.
/// `end_frame` prunes whatever the frame did not revisit.
///
/// The tree is only ever touched through the [`ExecutorHandle`]; every step
/// blocks until its job completed on the executor.
pub struct Reconciler {
    executor: ExecutorHandle,
    frame: FrameController,
    registry: ControlRegistry,
    pub(crate) layout: LayoutStack,
    factories: FactoryRegistry,
    style: Arc<dyn Style>,
    config: ReconcilerConfig,
    host: NodeId,
    root: NodeId,
    implicit_root: bool,
    stats: FrameStats,
}

impl Reconciler {
    pub fn new(
        executor: ExecutorHandle,
        host: NodeId,
        factories: FactoryRegistry,
    ) -> Result<Self, ReconcileError> {
        Self::with_config(executor, host, factories, ReconcilerConfig::default())
    }

    /// Binds to `host`. A host that cannot hold children gets an implicit
    /// vertical container attached inside it, which becomes the frame root.
    pub fn with_config(
        executor: ExecutorHandle,
        host: NodeId,
        factories: FactoryRegistry,
        config: ReconcilerConfig,
    ) -> Result<Self, ReconcileError> {
        let style: Arc<dyn Style> = Arc::new(DefaultStyle);
        let props = style.props(WidgetKind::VERTICAL);
        let (root, implicit_root) = executor.run(move |tree| -> Result<_, NodeError> {
            if tree.get(host)?.is_container() {
                return Ok((host, false));
            }
            let root = create_container(tree, Axis::Vertical, &props, host)?;
            Ok((root, true))
        })??;
        if implicit_root {
            debug!("host {host} is not a container; created implicit root {root}");
        }
        Ok(Self {
            executor,
            frame: FrameController::new(),
            registry: ControlRegistry::new(),
            layout: LayoutStack::new(),
            factories,
            style,
            config,
            host,
            root,
            implicit_root,
            stats: FrameStats::default(),
        })
    }

    /// Adds or overrides a kind. Only allowed before the first frame.
    pub fn register_factory(
        &mut self,
        kind: WidgetKind,
        factory: impl WidgetFactory + 'static,
    ) -> Result<Option<Arc<dyn WidgetFactory>>, ReconcileError> {
        if self.frame.frames() > 0 || self.frame.phase() == FramePhase::Disposed {
            return Err(ReconcileError::RegistrationClosed { kind });
        }
        Ok(self.factories.register(kind, factory))
    }

    /// Replaces the style applied on every resolution step from now on.
    pub fn set_style(&mut self, style: Arc<dyn Style>) {
        self.style = style;
    }

    pub fn begin_frame(&mut self) -> Result<(), ReconcileError> {
        self.frame.begin()?;
        self.layout.reset();
        self.stats = FrameStats::default();
        trace!("frame {} started", self.frame.frames());
        Ok(())
    }

    /// Closes the frame, pruning every widget and scope it did not revisit.
    pub fn end_frame(&mut self) -> Result<FrameStats, ReconcileError> {
        self.frame.ensure_active()?;
        let open = self.layout.depth();
        if open > 0 {
            return Err(ReconcileError::UnbalancedLayout { open });
        }
        self.invalidate_from(self.frame.counter())?;
        self.drop_scopes_from(self.layout.cursor())?;
        self.frame.end()?;
        let stats = std::mem::take(&mut self.stats);
        debug!("frame {} finished: {stats}", self.frame.frames());
        if self.config.dump_tree && log::log_enabled!(log::Level::Trace) {
            trace!("retained tree:\n{}", self.dump_tree()?);
        }
        Ok(stats)
    }

    /// Runs `content` inside one frame. The frame is closed even when
    /// `content` fails; its error wins over one from closing.
    pub fn frame<R>(
        &mut self,
        content: impl FnOnce(&mut Reconciler) -> Result<R, ReconcileError>,
    ) -> Result<(R, FrameStats), ReconcileError> {
        self.begin_frame()?;
        match content(self) {
            Ok(output) => Ok((output, self.end_frame()?)),
            Err(err) => {
                if let Err(end) = self.end_frame() {
                    warn!("closing frame after failed content: {end}");
                }
                Err(err)
            }
        }
    }

    /// Resolves one widget call of `kind` at the next positional id.
    ///
    /// A call that fails before an instance is stored at its id gives the id
    /// back, so later calls of the frame keep the registry contiguous.
    pub fn request(
        &mut self,
        kind: WidgetKind,
        args: WidgetArgs,
    ) -> Result<WidgetResponse, ReconcileError> {
        self.frame.ensure_active()?;
        let factory = self.factories.get(kind)?;
        let id = self.frame.next_id()?;
        self.stats.calls += 1;
        let parent = self.layout.target(self.root);

        if self.registry.matches(id, kind, parent) {
            return self.reuse(id, kind, args);
        }
        if let Some(previous) = self.registry.kind_of(id) {
            debug!("recreating {id}: {previous} -> {kind}");
        }
        self.create(id, kind, parent, factory, args).map_err(|err| {
            self.frame.rewind(id);
            err
        })
    }

    fn reuse(
        &mut self,
        id: ControlId,
        kind: WidgetKind,
        args: WidgetArgs,
    ) -> Result<WidgetResponse, ReconcileError> {
        let style = Arc::clone(&self.style);
        let widget = self.registry.take_widget(id)?;
        let outcome = self.executor.run(move |tree| {
            let mut widget = widget;
            let states = resolve(widget.as_mut(), style.as_ref(), &args, tree);
            (widget, states)
        });
        let (widget, states) = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                // The instance went down with the job but its node is still
                // attached, so the tail is pruned like a shrink.
                if let Err(cleanup) = self.invalidate_from(id) {
                    warn!("pruning after lost job at {id}: {cleanup}");
                    self.registry.remove_from(id);
                }
                self.frame.rewind(id);
                return Err(err.into());
            }
        };
        let handle = widget.handle();
        self.registry.restore_widget(id, widget);
        let states = states?;
        self.stats.reused += 1;
        trace!("reused {kind} at {id}");
        Ok(WidgetResponse::new(id, kind, handle, false, states))
    }

    fn create(
        &mut self,
        id: ControlId,
        kind: WidgetKind,
        parent: NodeId,
        factory: Arc<dyn WidgetFactory>,
        args: WidgetArgs,
    ) -> Result<WidgetResponse, ReconcileError> {
        self.invalidate_from(id)?;
        let style = Arc::clone(&self.style);
        let (constructed, mounted) = bounded(1);
        let outcome = self.executor.run(move |tree| -> Result<Resolved, NodeError> {
            let mut widget = factory.construct(tree)?;
            let handle = widget.handle();
            // Reported before anything else can fail, so a lost job can be cleaned up.
            let _ = constructed.send(handle);
            let states = tree
                .attach(parent, handle)
                .and_then(|()| resolve(widget.as_mut(), style.as_ref(), &args, tree));
            match states {
                Ok(states) => Ok((widget, states)),
                Err(err) => {
                    if tree.contains(handle) {
                        tree.remove(handle)?;
                    }
                    Err(err)
                }
            }
        });
        let (widget, states) = match outcome {
            Ok(resolved) => resolved?,
            Err(err) => {
                if let Ok(handle) = mounted.try_recv() {
                    self.discard_node(handle);
                }
                return Err(err.into());
            }
        };
        let handle = widget.handle();
        self.registry.insert(id, ControlEntry::new(parent, widget))?;
        self.stats.created += 1;
        debug!("created {kind} at {id} (node {handle} under {parent})");
        Ok(WidgetResponse::new(id, kind, handle, true, states))
    }

    pub fn begin_horizontal(&mut self) -> Result<LayoutScope<'_>, ReconcileError> {
        self.begin_scope(Axis::Horizontal)
    }

    pub fn begin_vertical(&mut self) -> Result<LayoutScope<'_>, ReconcileError> {
        self.begin_scope(Axis::Vertical)
    }

    pub fn horizontal<R>(
        &mut self,
        content: impl FnOnce(&mut Reconciler) -> Result<R, ReconcileError>,
    ) -> Result<R, ReconcileError> {
        let mut scope = self.begin_horizontal()?;
        content(&mut scope)
    }

    pub fn vertical<R>(
        &mut self,
        content: impl FnOnce(&mut Reconciler) -> Result<R, ReconcileError>,
    ) -> Result<R, ReconcileError> {
        let mut scope = self.begin_vertical()?;
        content(&mut scope)
    }

    fn begin_scope(&mut self, axis: Axis) -> Result<LayoutScope<'_>, ReconcileError> {
        self.frame.ensure_active()?;
        let parent = self.layout.target(self.root);
        let first = self.frame.counter();
        let ordinal = self.layout.next_ordinal();
        let props = self.style.props(axis.kind());

        let retained = match self.layout.candidate(ordinal, axis, parent, first) {
            Some(container) => self
                .executor
                .run(move |tree| -> Result<bool, NodeError> {
                    if tree.parent(container) != Some(parent) {
                        return Ok(false);
                    }
                    tree.with_node_mut(container, |node: &mut ContainerNode| {
                        node.set_style(&props)
                    })?;
                    Ok(true)
                })??
                .then_some(container),
            None => None,
        };

        let container = match retained {
            Some(container) => {
                trace!("reused {axis:?} scope {ordinal} (node {container})");
                container
            }
            None => {
                // Everything after this point may sit after the old container.
                self.invalidate_from(first)?;
                self.drop_scopes_from(ordinal)?;
                let container = self
                    .executor
                    .run(move |tree| create_container(tree, axis, &props, parent))??;
                self.layout.record(ordinal, axis, parent, first, container);
                self.stats.containers_created += 1;
                debug!("opened {axis:?} scope {ordinal} (node {container} under {parent})");
                container
            }
        };
        let depth = self.layout.push(container);
        Ok(LayoutScope::new(self, depth, container))
    }

    /// Tears the retained tree down: every widget, every scope container and
    /// the implicit root. Further calls fail with [`ReconcileError::Disposed`].
    pub fn dispose(&mut self) -> Result<FrameStats, ReconcileError> {
        if self.frame.phase() == FramePhase::Disposed {
            return Err(ReconcileError::Disposed);
        }
        self.layout.reset();
        self.stats = FrameStats::default();
        self.invalidate_from(ControlId::default())?;
        self.drop_scopes_from(0)?;
        if self.implicit_root {
            let root = self.root;
            self.executor.run(move |tree| tree.remove(root))??;
            self.implicit_root = false;
        }
        self.frame.dispose();
        let stats = std::mem::take(&mut self.stats);
        debug!("reconciler disposed: {stats}");
        Ok(stats)
    }

    /// Removes every id `>= from`, collapsing containers left empty.
    fn invalidate_from(&mut self, from: ControlId) -> Result<(), ReconcileError> {
        let handles = self.registry.handles_from(from);
        if handles.is_empty() {
            return Ok(());
        }
        let boundary = self.layout.boundary(self.root);
        let report = self
            .executor
            .run(move |tree| prune_widgets(tree, &handles, &boundary))??;
        let removed = self.registry.remove_from(from);
        self.layout.forget(&report.collapsed);
        self.stats.destroyed += removed;
        self.stats.containers_pruned += report.collapsed.len();
        debug!(
            "invalidated {removed} control(s) from {from}, collapsed {} container(s)",
            report.collapsed.len()
        );
        Ok(())
    }

    /// Removes a node whose instance was lost with its job.
    fn discard_node(&mut self, handle: NodeId) {
        let boundary = self.layout.boundary(self.root);
        match self
            .executor
            .run(move |tree| prune_widgets(tree, &[handle], &boundary))
        {
            Ok(Ok(report)) => {
                self.layout.forget(&report.collapsed);
                debug!("discarded node {handle} of a lost job");
            }
            Ok(Err(err)) => warn!("discarding node {handle}: {err}"),
            Err(err) => warn!("discarding node {handle}: {err}"),
        }
    }

    /// Destroys the containers of every scope record from `ordinal` on.
    fn drop_scopes_from(&mut self, ordinal: usize) -> Result<(), ReconcileError> {
        let stale = self.layout.truncate(ordinal);
        if stale.is_empty() {
            return Ok(());
        }
        let boundary = self.layout.boundary(self.root);
        let report = self
            .executor
            .run(move |tree| destroy_containers(tree, &stale, &boundary))??;
        self.layout.forget(&report.collapsed);
        let pruned = report.destroyed + report.collapsed.len();
        self.stats.containers_pruned += pruned;
        debug!("dropped {pruned} scope container(s) from scope {ordinal}");
        Ok(())
    }

    /// Renders the tree under the host node.
    pub fn dump_tree(&self) -> Result<String, ReconcileError> {
        let host = self.host;
        Ok(self
            .executor
            .run(move |tree| crate::dump_subtree(tree, host))?)
    }

    pub fn registry(&self) -> &ControlRegistry {
        &self.registry
    }

    pub fn layout(&self) -> &LayoutStack {
        &self.layout
    }

    pub fn factories(&self) -> &FactoryRegistry {
        &self.factories
    }

    pub fn executor(&self) -> &ExecutorHandle {
        &self.executor
    }

    pub fn config(&self) -> ReconcilerConfig {
        self.config
    }

    pub fn phase(&self) -> FramePhase {
        self.frame.phase()
    }

    /// Number of frames begun so far.
    pub fn frames(&self) -> u64 {
        self.frame.frames()
    }

    pub fn host(&self) -> NodeId {
        self.host
    }

    /// Container new top-level widgets attach to.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn has_implicit_root(&self) -> bool {
        self.implicit_root
    }
}

impl Drop for Reconciler {
    fn drop(&mut self) {
        if self.frame.phase() == FramePhase::Disposed {
            return;
        }
        if let Err(err) = self.dispose() {
            warn!("failed to dispose reconciler: {err}");
        }
    }
}

impl fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("phase", &self.frame.phase())
            .field("frames", &self.frame.frames())
            .field("root", &self.root)
            .field("registry", &self.registry)
            .field("layout", &self.layout)
            .field("factories", &self.factories)
            .finish_non_exhaustive()
    }
}

type Resolved = (Box<dyn Widget>, Vec<(StateKey, StateValue)>);

fn resolve(
    widget: &mut dyn Widget,
    style: &dyn Style,
    args: &WidgetArgs,
    tree: &mut dyn Applier,
) -> Result<Vec<(StateKey, StateValue)>, NodeError> {
    widget.apply_style(style, tree)?;
    widget.update(args, tree)?;
    Ok(snapshot(widget, tree))
}

fn create_container(
    tree: &mut dyn Applier,
    axis: Axis,
    props: &StyleProps,
    parent: NodeId,
) -> Result<NodeId, NodeError> {
    let mut node = ContainerNode::new(axis);
    node.set_style(props);
    let id = tree.create(Box::new(node));
    if let Err(err) = tree.attach(parent, id) {
        tree.remove(id)?;
        return Err(err);
    }
    Ok(id)
}
