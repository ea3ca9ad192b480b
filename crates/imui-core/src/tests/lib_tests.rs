use super::*;
use std::sync::Arc;

const LEAF: WidgetKind = WidgetKind::new("leaf");
const TOGGLE: WidgetKind = WidgetKind::new("toggle");

#[derive(Default)]
struct TestNode {
    label: String,
    on: bool,
    font_size: f32,
}

impl Node for TestNode {
    fn debug_label(&self) -> String {
        format!("TestNode({})", self.label)
    }
}

struct TestWidget {
    kind: WidgetKind,
    handle: NodeId,
    seeded: bool,
}

impl Widget for TestWidget {
    fn kind(&self) -> WidgetKind {
        self.kind
    }

    fn handle(&self) -> NodeId {
        self.handle
    }

    fn apply_style(&mut self, style: &dyn Style, tree: &mut dyn Applier) -> Result<(), NodeError> {
        let font_size = style.props(self.kind).font_size;
        tree.with_node_mut(self.handle, |node: &mut TestNode| node.font_size = font_size)
    }

    fn update(&mut self, args: &WidgetArgs, tree: &mut dyn Applier) -> Result<(), NodeError> {
        let seed = !self.seeded;
        self.seeded = true;
        match args {
            WidgetArgs::Label { text } => {
                let text = text.clone();
                tree.with_node_mut(self.handle, |node: &mut TestNode| node.label = text)
            }
            WidgetArgs::Checkbox { label, checked } => {
                let (label, checked) = (label.clone(), *checked);
                tree.with_node_mut(self.handle, |node: &mut TestNode| {
                    node.label = label;
                    if seed {
                        node.on = checked;
                    }
                })
            }
            _ => Err(NodeError::UnexpectedArgs { kind: self.kind }),
        }
    }

    fn state(&self, key: StateKey, tree: &dyn Applier) -> Option<StateValue> {
        match key {
            StateKey::Checked => tree
                .with_node(self.handle, |node: &TestNode| StateValue::Bool(node.on))
                .ok(),
            _ => None,
        }
    }

    fn state_keys(&self) -> &'static [StateKey] {
        if self.kind == TOGGLE {
            &[StateKey::Checked]
        } else {
            &[]
        }
    }
}

fn construct(tree: &mut dyn Applier, kind: WidgetKind) -> Box<dyn Widget> {
    let handle = tree.create(Box::new(TestNode::default()));
    Box::new(TestWidget {
        kind,
        handle,
        seeded: false,
    })
}

fn make_leaf(tree: &mut dyn Applier) -> Result<Box<dyn Widget>, NodeError> {
    Ok(construct(tree, LEAF))
}

fn make_toggle(tree: &mut dyn Applier) -> Result<Box<dyn Widget>, NodeError> {
    Ok(construct(tree, TOGGLE))
}

fn factories() -> FactoryRegistry {
    FactoryRegistry::new()
        .with(LEAF, make_leaf)
        .with(TOGGLE, make_toggle)
}

struct Harness {
    ui: Reconciler,
    executor: ExecutorHandle,
    host: NodeId,
}

fn harness() -> Harness {
    let mut tree = MemoryApplier::new();
    let host = tree.create(Box::new(ContainerNode::new(Axis::Vertical)));
    let executor = InlineExecutor::handle(tree);
    let ui = Reconciler::new(executor.clone(), host, factories()).expect("reconciler binds");
    Harness { ui, executor, host }
}

fn leaf(ui: &mut Reconciler, text: &str) -> Result<WidgetResponse, ReconcileError> {
    ui.request(
        LEAF,
        WidgetArgs::Label {
            text: text.to_string(),
        },
    )
}

fn toggle(ui: &mut Reconciler, label: &str, checked: bool) -> Result<bool, ReconcileError> {
    let response = ui.request(
        TOGGLE,
        WidgetArgs::Checkbox {
            label: label.to_string(),
            checked,
        },
    )?;
    Ok(response.bool(StateKey::Checked).unwrap_or(checked))
}

fn contains(executor: &ExecutorHandle, id: NodeId) -> bool {
    executor.run(move |tree| tree.contains(id)).unwrap()
}

fn parent(executor: &ExecutorHandle, id: NodeId) -> Option<NodeId> {
    executor.run(move |tree| tree.parent(id)).unwrap()
}

fn children(executor: &ExecutorHandle, id: NodeId) -> Vec<NodeId> {
    executor.run(move |tree| tree.children(id)).unwrap().unwrap()
}

fn labels(executor: &ExecutorHandle, id: NodeId) -> Vec<String> {
    executor
        .run(move |tree| -> Result<Vec<String>, NodeError> {
            tree.children(id)?
                .into_iter()
                .map(|child| -> Result<String, NodeError> { Ok(tree.get(child)?.debug_label()) })
                .collect()
        })
        .unwrap()
        .unwrap()
}

fn form(ui: &mut Reconciler) -> Result<bool, ReconcileError> {
    leaf(ui, "title")?;
    let checked = ui.horizontal(|ui| {
        let checked = toggle(ui, "enabled", true)?;
        leaf(ui, "hint")?;
        Ok(checked)
    })?;
    ui.vertical(|ui| {
        leaf(ui, "footer")?;
        Ok(())
    })?;
    Ok(checked)
}

#[test]
fn memory_applier_rejects_second_parent() {
    let mut tree = MemoryApplier::new();
    let a = tree.create(Box::new(ContainerNode::new(Axis::Vertical)));
    let b = tree.create(Box::new(ContainerNode::new(Axis::Vertical)));
    let child = tree.create(Box::new(TestNode::default()));
    tree.attach(a, child).unwrap();
    assert_eq!(
        tree.attach(b, child),
        Err(NodeError::AlreadyAttached { id: child, parent: a })
    );
    assert_eq!(tree.attach(a, a), Err(NodeError::Cycle { id: a }));
    assert_eq!(tree.detach(child), Ok(Some(a)));
    assert_eq!(tree.detach(child), Ok(None));
    tree.attach(b, child).unwrap();
    assert_eq!(tree.parent(child), Some(b));
}

#[test]
fn memory_applier_remove_destroys_subtree() {
    let mut tree = MemoryApplier::new();
    let root = tree.create(Box::new(ContainerNode::new(Axis::Vertical)));
    let inner = tree.create(Box::new(ContainerNode::new(Axis::Horizontal)));
    let child = tree.create(Box::new(TestNode::default()));
    tree.attach(root, inner).unwrap();
    tree.attach(inner, child).unwrap();

    tree.remove(inner).unwrap();

    assert!(!tree.contains(inner));
    assert!(!tree.contains(child));
    assert!(tree.children(root).unwrap().is_empty());
    assert_eq!(tree.len(), 1);
    assert!(tree.dump_tree(Some(root)).starts_with("[0] VerticalContainer"));
}

#[test]
fn identical_frames_reuse_everything() {
    let mut h = harness();
    let (checked, first) = h.ui.frame(form).unwrap();
    assert!(checked);
    assert_eq!(first.created, 4);
    assert_eq!(first.containers_created, 2);

    let (checked, second) = h.ui.frame(form).unwrap();
    assert!(checked);
    assert_eq!(second.calls, 4);
    assert_eq!(second.reused, 4);
    assert_eq!(second.created, 0);
    assert_eq!(second.destroyed, 0);
    assert!(second.is_stable());
}

#[test]
fn returned_state_matches_live_widget() {
    let mut h = harness();
    h.ui.begin_frame().unwrap();
    let response = h
        .ui
        .request(
            TOGGLE,
            WidgetArgs::Checkbox {
                label: "live".into(),
                checked: true,
            },
        )
        .unwrap();
    h.ui.end_frame().unwrap();

    let handle = response.handle;
    let live = h
        .executor
        .run(move |tree| tree.with_node(handle, |node: &TestNode| node.on))
        .unwrap()
        .unwrap();
    assert_eq!(response.bool(StateKey::Checked), Some(live));
}

#[test]
fn shrinking_frame_prunes_the_tail() {
    let mut h = harness();
    h.ui.begin_frame().unwrap();
    let handles: Vec<NodeId> = (0..6)
        .map(|n| leaf(&mut h.ui, &format!("row {n}")).unwrap().handle)
        .collect();
    h.ui.end_frame().unwrap();

    h.ui.begin_frame().unwrap();
    for n in 0..3 {
        leaf(&mut h.ui, &format!("row {n}")).unwrap();
    }
    let stats = h.ui.end_frame().unwrap();

    assert_eq!(stats.destroyed, 3);
    assert_eq!(h.ui.registry().len(), 3);
    for id in 3..6 {
        assert!(!h.ui.registry().contains(ControlId::new(id)));
        assert!(!contains(&h.executor, handles[id]));
    }
    assert_eq!(children(&h.executor, h.host), handles[..3].to_vec());
}

#[test]
fn kind_change_recreates_within_the_call() {
    let mut h = harness();
    h.ui.begin_frame().unwrap();
    leaf(&mut h.ui, "a").unwrap();
    let old = leaf(&mut h.ui, "b").unwrap().handle;
    h.ui.end_frame().unwrap();

    h.ui.begin_frame().unwrap();
    leaf(&mut h.ui, "a").unwrap();
    let response = h
        .ui
        .request(
            TOGGLE,
            WidgetArgs::Checkbox {
                label: "b".into(),
                checked: false,
            },
        )
        .unwrap();

    assert!(response.created);
    assert_eq!(response.id, ControlId::new(1));
    assert_ne!(response.handle, old);
    assert!(!contains(&h.executor, old));
    assert_eq!(parent(&h.executor, response.handle), Some(h.host));
    assert_eq!(h.ui.registry().kind_of(ControlId::new(1)), Some(TOGGLE));

    let stats = h.ui.end_frame().unwrap();
    assert_eq!(stats.created, 1);
    assert_eq!(stats.destroyed, 1);
}

fn nested(ui: &mut Reconciler, deep: bool) -> Result<(), ReconcileError> {
    leaf(ui, "keep")?;
    ui.vertical(|ui| {
        leaf(ui, "x")?;
        if deep {
            ui.vertical(|ui| ui.vertical(|ui| leaf(ui, "deep").map(|_| ())))?;
        }
        Ok(())
    })
}

#[test]
fn emptied_containers_collapse_to_first_non_empty_ancestor() {
    let mut h = harness();
    h.ui.frame(|ui| nested(ui, true)).unwrap();
    let outer = h.ui.layout().containers()[0];
    assert_eq!(h.ui.layout().containers().len(), 3);

    let (_, stats) = h.ui.frame(|ui| nested(ui, false)).unwrap();

    assert_eq!(stats.destroyed, 1);
    assert_eq!(stats.containers_pruned, 2);
    assert_eq!(h.ui.layout().containers(), vec![outer]);
    assert_eq!(labels(&h.executor, outer), vec!["TestNode(x)".to_string()]);
    assert_eq!(
        labels(&h.executor, h.host),
        vec!["TestNode(keep)".to_string(), "VerticalContainer".to_string()]
    );
}

#[test]
fn collapse_stops_at_the_root() {
    let mut h = harness();
    h.ui.frame(|ui| ui.vertical(|ui| ui.horizontal(|ui| leaf(ui, "only"))))
        .unwrap();
    assert_eq!(children(&h.executor, h.host).len(), 1);

    let (_, stats) = h.ui.frame(|_| Ok(())).unwrap();

    assert_eq!(stats.destroyed, 1);
    assert_eq!(stats.containers_pruned, 2);
    assert!(contains(&h.executor, h.host));
    assert!(children(&h.executor, h.host).is_empty());
}

#[test]
fn one_widget_then_empty_frame_leaves_nothing() {
    let mut h = harness();
    let (response, _) = h.ui.frame(|ui| leaf(ui, "button")).unwrap();
    assert_eq!(response.id, ControlId::new(0));

    let (_, stats) = h.ui.frame(|_| Ok(())).unwrap();

    assert_eq!(stats.destroyed, 1);
    assert!(h.ui.registry().is_empty());
    assert!(!h.ui.registry().contains(ControlId::new(0)));
    assert!(!contains(&h.executor, response.handle));
}

#[test]
fn out_of_band_change_survives_stale_arguments() {
    let mut h = harness();
    h.ui.begin_frame().unwrap();
    let response = h
        .ui
        .request(
            TOGGLE,
            WidgetArgs::Checkbox {
                label: "wifi".into(),
                checked: true,
            },
        )
        .unwrap();
    h.ui.end_frame().unwrap();
    assert_eq!(response.bool(StateKey::Checked), Some(true));

    let handle = response.handle;
    h.executor
        .run(move |tree| tree.with_node_mut(handle, |node: &mut TestNode| node.on = false))
        .unwrap()
        .unwrap();

    let (checked, _) = h.ui.frame(|ui| toggle(ui, "wifi", true)).unwrap();
    assert!(!checked);
}

#[test]
fn scope_container_is_kept_while_its_content_shrinks() {
    let mut h = harness();
    let (container, _) = h
        .ui
        .frame(|ui| {
            let mut row = ui.begin_horizontal()?;
            leaf(&mut row, "a")?;
            leaf(&mut row, "b")?;
            let container = row.container();
            row.close();
            leaf(ui, "c")?;
            Ok(container)
        })
        .unwrap();

    let (again, stats) = h
        .ui
        .frame(|ui| {
            let container = ui.horizontal(|ui| {
                leaf(ui, "a")?;
                Ok(ui.layout().containers()[0])
            })?;
            leaf(ui, "c")?;
            Ok(container)
        })
        .unwrap();

    assert_eq!(again, container);
    assert_eq!(stats.containers_created, 0);
    assert_eq!(stats.destroyed, 2);
    assert_eq!(stats.created, 1);
    assert_eq!(labels(&h.executor, container), vec!["TestNode(a)".to_string()]);
    assert_eq!(
        labels(&h.executor, h.host),
        vec!["HorizontalContainer".to_string(), "TestNode(c)".to_string()]
    );
}

#[test]
fn reordered_calls_keep_sibling_order() {
    let mut h = harness();
    h.ui.frame(|ui| {
        leaf(ui, "a")?;
        ui.vertical(|ui| leaf(ui, "b"))?;
        leaf(ui, "c")
    })
    .unwrap();

    let (_, stats) = h
        .ui
        .frame(|ui| {
            ui.vertical(|ui| leaf(ui, "b"))?;
            leaf(ui, "a")?;
            leaf(ui, "c")
        })
        .unwrap();

    assert_eq!(stats.destroyed, 3);
    assert_eq!(stats.created, 3);
    assert_eq!(stats.containers_created, 1);
    assert_eq!(
        labels(&h.executor, h.host),
        vec![
            "VerticalContainer".to_string(),
            "TestNode(a)".to_string(),
            "TestNode(c)".to_string(),
        ]
    );
}

#[test]
fn scope_guard_pops_on_early_return() {
    let mut h = harness();
    h.ui.begin_frame().unwrap();
    let result = h.ui.vertical(|ui| {
        leaf(ui, "a")?;
        ui.request(WidgetKind::new("missing"), WidgetArgs::None)?;
        Ok(())
    });
    assert_eq!(
        result,
        Err(ReconcileError::MissingFactory {
            kind: WidgetKind::new("missing")
        })
    );
    assert_eq!(h.ui.layout().depth(), 0);
    h.ui.end_frame().unwrap();
}

#[test]
fn end_frame_rejects_open_scopes() {
    let mut h = harness();
    h.ui.begin_frame().unwrap();
    let mut scope = h.ui.begin_vertical().unwrap();
    assert_eq!(
        scope.end_frame(),
        Err(ReconcileError::UnbalancedLayout { open: 1 })
    );
    drop(scope);
    assert!(h.ui.end_frame().is_ok());
}

#[test]
fn frame_protocol_errors() {
    let mut h = harness();
    assert_eq!(leaf(&mut h.ui, "early"), Err(ReconcileError::NoActiveFrame));
    assert_eq!(h.ui.end_frame(), Err(ReconcileError::NoActiveFrame));

    h.ui.begin_frame().unwrap();
    assert_eq!(h.ui.begin_frame(), Err(ReconcileError::FrameAlreadyActive));
    let missing = h.ui.request(WidgetKind::new("nope"), WidgetArgs::None);
    assert!(matches!(missing, Err(ReconcileError::MissingFactory { .. })));
    // A rejected call does not consume an id.
    assert_eq!(leaf(&mut h.ui, "first").unwrap().id, ControlId::new(0));
    h.ui.end_frame().unwrap();

    assert_eq!(leaf(&mut h.ui, "late"), Err(ReconcileError::NoActiveFrame));
}

#[test]
fn failed_creation_gives_the_id_back() {
    let mut h = harness();
    h.ui.begin_frame().unwrap();
    leaf(&mut h.ui, "before").unwrap();
    let failed = h.ui.request(LEAF, WidgetArgs::None);
    assert_eq!(
        failed,
        Err(ReconcileError::Node(NodeError::UnexpectedArgs { kind: LEAF }))
    );
    let after = leaf(&mut h.ui, "after").unwrap();
    assert_eq!(after.id, ControlId::new(1));
    let stats = h.ui.end_frame().unwrap();

    assert_eq!(stats.created, 2);
    assert_eq!(h.ui.registry().len(), 2);
    assert_eq!(
        labels(&h.executor, h.host),
        vec!["TestNode(before)".to_string(), "TestNode(after)".to_string()]
    );
}

#[test]
fn registration_closes_with_the_first_frame() {
    let mut h = harness();
    let replaced = h.ui.register_factory(LEAF, make_toggle).unwrap();
    assert!(replaced.is_some());
    let added = h.ui.register_factory(WidgetKind::new("extra"), make_leaf).unwrap();
    assert!(added.is_none());

    h.ui.frame(|_| Ok(())).unwrap();
    let kind = WidgetKind::new("late");
    assert!(matches!(
        h.ui.register_factory(kind, make_leaf),
        Err(ReconcileError::RegistrationClosed { kind: rejected }) if rejected == kind
    ));
}

#[test]
fn style_reaches_widgets_and_containers() {
    struct Large;

    impl Style for Large {
        fn props(&self, _kind: WidgetKind) -> StyleProps {
            StyleProps {
                font_size: 22.0,
                spacing: 12.0,
                ..StyleProps::default()
            }
        }
    }

    let mut h = harness();
    h.ui.frame(|ui| ui.horizontal(|ui| leaf(ui, "a"))).unwrap();
    h.ui.set_style(Arc::new(Large));
    let (response, _) = h.ui.frame(|ui| ui.horizontal(|ui| leaf(ui, "a"))).unwrap();

    let handle = response.handle;
    let container = h.ui.layout().containers()[0];
    let (font_size, spacing) = h
        .executor
        .run(move |tree| -> Result<(f32, f32), NodeError> {
            let font_size = tree.with_node(handle, |node: &TestNode| node.font_size)?;
            let spacing = tree.with_node(container, |node: &ContainerNode| node.spacing())?;
            Ok((font_size, spacing))
        })
        .unwrap()
        .unwrap();
    assert_eq!(font_size, 22.0);
    assert_eq!(spacing, 12.0);
}

#[test]
fn non_container_host_gets_implicit_root() {
    let mut tree = MemoryApplier::new();
    let host = tree.create(Box::new(TestNode::default()));
    let executor = InlineExecutor::handle(tree);
    let mut ui = Reconciler::new(executor.clone(), host, factories()).unwrap();

    assert!(ui.has_implicit_root());
    let root = ui.root();
    assert_ne!(root, host);
    assert_eq!(parent(&executor, root), Some(host));

    let (response, _) = ui.frame(|ui| leaf(ui, "inside")).unwrap();
    assert_eq!(parent(&executor, response.handle), Some(root));

    ui.dispose().unwrap();
    assert!(!contains(&executor, root));
    assert!(contains(&executor, host));
}

#[test]
fn dispose_tears_everything_down() {
    let mut h = harness();
    h.ui.frame(form).unwrap();

    let stats = h.ui.dispose().unwrap();

    assert_eq!(stats.destroyed, 4);
    assert_eq!(stats.containers_pruned, 2);
    assert!(h.ui.registry().is_empty());
    assert!(h.ui.layout().containers().is_empty());
    assert!(children(&h.executor, h.host).is_empty());
    assert_eq!(h.ui.phase(), FramePhase::Disposed);
    assert_eq!(h.ui.begin_frame(), Err(ReconcileError::Disposed));
    assert_eq!(h.ui.dispose(), Err(ReconcileError::Disposed));
}

#[test]
fn dropping_the_reconciler_disposes_it() {
    let Harness {
        mut ui,
        executor,
        host,
    } = harness();
    ui.frame(form).unwrap();
    drop(ui);

    assert!(children(&executor, host).is_empty());
}

#[test]
fn dump_lists_widgets_under_the_host() {
    let mut h = harness();
    h.ui.frame(form).unwrap();
    let dump = h.ui.dump_tree().unwrap();
    assert!(dump.starts_with(&format!("[{}] VerticalContainer", h.host)));
    assert!(dump.contains("  [")); // indented children
    assert!(dump.contains("TestNode(footer)"));
}
