use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use imui_core::{
    Applier, Color, ControlId, MemoryApplier, ReconcileError, Reconciler, Style, StyleProps, WidgetKind,
};
use imui_runtime_std::ThreadExecutor;
use imui_widgets::{reconciler, CheckboxNode, SliderNode, TextInputNode, WidgetCalls, WindowNode};
use thiserror::Error;

#[derive(Error, Debug)]
enum DemoError {
    #[error("failed to start the ui thread: {0}")]
    Spawn(#[from] io::Error),
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

#[derive(Debug, Clone)]
struct Settings {
    name: String,
    notifications: bool,
    volume: f64,
    advanced: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name: "Ada".to_string(),
            notifications: true,
            volume: 40.0,
            advanced: true,
        }
    }
}

/// Dense dark theme; containers keep no padding.
struct CompactStyle;

impl Style for CompactStyle {
    fn props(&self, kind: WidgetKind) -> StyleProps {
        let base = StyleProps {
            foreground: Color::from_rgb_u8(0xe6, 0xe6, 0xe6),
            background: Color::from_rgb_u8(0x20, 0x22, 0x26),
            font_size: 12.0,
            padding: 2.0,
            spacing: 4.0,
        };
        match kind {
            WidgetKind::HORIZONTAL | WidgetKind::VERTICAL => StyleProps {
                padding: 0.0,
                background: Color::TRANSPARENT,
                ..base
            },
            _ => base,
        }
    }
}

fn settings_form(ui: &mut Reconciler, settings: &mut Settings) -> Result<bool, ReconcileError> {
    ui.label("Settings")?;
    ui.horizontal(|ui| {
        ui.image("avatar.png", (32.0, 32.0))?;
        settings.name = ui.text_input("Name", &settings.name)?;
        Ok(())
    })?;
    settings.notifications = ui.checkbox("Notifications", settings.notifications)?;
    if settings.advanced {
        ui.vertical(|ui| {
            ui.label("Advanced")?;
            settings.volume = ui.slider("Volume", settings.volume, 0.0..=100.0)?;
            ui.horizontal(|ui| {
                ui.label("Experimental")?;
                ui.checkbox("Beta features", false)?;
                Ok(())
            })
        })?;
    }
    ui.button("Save")
}

/// Pokes the node behind `id` the way a user would, on the executor thread.
fn interact<N: imui_core::Node>(
    ui: &Reconciler,
    id: usize,
    action: impl FnOnce(&mut N) + Send + 'static,
) -> Result<(), ReconcileError> {
    let id = ControlId::new(id);
    let handle = ui
        .registry()
        .handle_of(id)
        .ok_or(ReconcileError::InstanceMissing { id })?;
    ui.executor()
        .run(move |tree| tree.with_node_mut(handle, action))??;
    Ok(())
}

fn run() -> Result<(), DemoError> {
    let mut tree = MemoryApplier::new();
    let window = tree.create(Box::new(WindowNode::new("imui demo")));
    let executor = ThreadExecutor::spawn(tree)?;
    let mut ui = reconciler(executor.handle(), window)?;
    ui.set_style(Arc::new(CompactStyle));
    let mut settings = Settings::default();

    for frame in 1..=2 {
        let (saved, stats) = ui.frame(|ui| settings_form(ui, &mut settings))?;
        println!("frame {frame}: {stats} (saved: {saved})");
    }

    // Control ids of the form: 0 title, 1 avatar, 2 name, 3 notifications, 4 advanced
    // label, 5 volume, 6 experimental label, 7 beta, 8 save.
    interact(&ui, 2, |node: &mut TextInputNode| node.set_text("Grace"))?;
    interact(&ui, 3, |node: &mut CheckboxNode| node.toggle())?;
    interact(&ui, 5, |node: &mut SliderNode| node.drag_to(75.0))?;
    interact(&ui, 8, |node: &mut imui_widgets::ButtonNode| node.press())?;

    let (saved, stats) = ui.frame(|ui| settings_form(ui, &mut settings))?;
    println!("after interaction: {stats} (saved: {saved})");
    println!("settings: {settings:?}");

    settings.advanced = false;
    let (_, stats) = ui.frame(|ui| settings_form(ui, &mut settings))?;
    println!("advanced section hidden: {stats}");
    println!("{}", ui.dump_tree()?);

    let stats = ui.dispose()?;
    println!("disposed: {stats}");
    drop(ui);
    if executor.shutdown().is_none() {
        log::warn!("ui thread did not hand the tree back");
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    println!("=== imui reconciliation demo ===");
    println!("Runs a settings form for a few frames on a dedicated UI thread,");
    println!("simulates user input and then hides a section of the form.");
    println!("Set RUST_LOG=debug (and IMUI_DEBUG=1 with RUST_LOG=trace) for details.");
    println!();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("demo failed: {err}");
            ExitCode::FAILURE
        }
    }
}
