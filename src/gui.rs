use std::sync::{Arc, Mutex};
use std::time::Duration;

use glib::timeout_add_local;
use gtk::cairo::{Context, FontSlant, FontWeight};
use gtk::prelude::*;
use gtk::{Application, ApplicationWindow, DrawingArea, Orientation};

use ruleta::animation::{self, SpinAnimation};
use ruleta::raffle::selector;
use ruleta::raffle::util;
use ruleta::raffle::{Participant, ParticipantId, Registry, WinnerRecord};

/// Estado compartido entre los closures de la interfaz.
pub struct RaffleApp {
    pub registry: Registry,
    /// Rotación actual de la rueda, en grados [0, 360).
    pub rotation: f64,
    /// Giro en vuelo, si hay uno. Mientras exista no se aceptan sorteos.
    pub spin: Option<SpinAnimation>,
    pub spin_started_ms: u64,
    /// Ganador ya seleccionado, pendiente de confirmar al terminar el giro.
    pub pending_winner: Option<Participant>,
    /// Participante cargado en el formulario para editar.
    pub editing: Option<ParticipantId>,
}

impl RaffleApp {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            rotation: 0.0,
            spin: None,
            spin_started_ms: 0,
            pending_winner: None,
            editing: None,
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.spin.is_some()
    }
}

impl Default for RaffleApp {
    fn default() -> Self {
        Self::new()
    }
}

// Alias útil para compartir el estado
pub type SharedApp = Arc<Mutex<RaffleApp>>;

// Paleta de la rueda (se repite cada 8 participantes)
const WHEEL_COLORS: [(f64, f64, f64); 8] = [
    (0.92, 0.18, 0.28),
    (0.54, 0.35, 0.97),
    (0.03, 0.67, 0.98),
    (0.03, 0.85, 0.61),
    (1.00, 0.76, 0.02),
    (1.00, 0.46, 0.10),
    (0.75, 0.35, 0.95),
    (0.08, 0.82, 0.82),
];

const EMPTY_WHEEL_TEXT: &str = "Agregue participantes";

/// Arranca la aplicación GTK usando el estado compartido.
pub fn run_gui(state: SharedApp) {
    let app = Application::builder()
        .application_id("cr.tecdos.ruleta")
        .build();

    let state_for_ui = state.clone();
    app.connect_activate(move |app| {
        build_ui(app, state_for_ui.clone());
    });

    app.run();
}

// Copias de los widgets que los closures necesitan tocar.
#[derive(Clone)]
struct Controls {
    name_entry: gtk::Entry,
    entries_spin: gtk::SpinButton,
    save_btn: gtk::Button,
    cancel_btn: gtk::Button,
    participant_list: gtk::ListBox,
    history_list: gtk::ListBox,
    total_label: gtk::Label,
    status_label: gtk::Label,
    draw_btn: gtk::Button,
    reset_btn: gtk::Button,
    area: DrawingArea,
}

fn build_ui(app: &Application, state: SharedApp) {
    let window = ApplicationWindow::builder()
        .application(app)
        .title("Ruleta de Sorteos")
        .default_width(1000)
        .default_height(640)
        .build();

    // ----- Columna izquierda: formulario + lista de participantes -----
    let left = gtk::Box::new(Orientation::Vertical, 12);
    left.set_width_request(300);

    let form_box = gtk::Box::new(Orientation::Vertical, 6);
    form_box.set_margin_top(8);
    form_box.set_margin_bottom(8);
    form_box.set_margin_start(8);
    form_box.set_margin_end(8);

    let name_entry = gtk::Entry::builder()
        .placeholder_text("Nombre del participante")
        .build();
    let entries_spin = gtk::SpinButton::with_range(1.0, 999.0, 1.0);
    let save_btn = gtk::Button::with_label("Agregar");
    let cancel_btn = gtk::Button::with_label("Cancelar edición");
    cancel_btn.set_visible(false);

    form_box.append(&gtk::Label::new(Some("Nombre")));
    form_box.append(&name_entry);
    form_box.append(&gtk::Label::new(Some("Entradas")));
    form_box.append(&entries_spin);
    form_box.append(&save_btn);
    form_box.append(&cancel_btn);

    let form_frame = gtk::Frame::new(Some("Participante"));
    form_frame.set_child(Some(&form_box));
    left.append(&form_frame);

    let participant_list = gtk::ListBox::new();
    participant_list.set_selection_mode(gtk::SelectionMode::None);
    let participant_scroll = gtk::ScrolledWindow::builder()
        .hscrollbar_policy(gtk::PolicyType::Never)
        .min_content_height(240)
        .child(&participant_list)
        .build();
    let participant_frame = gtk::Frame::new(Some("Participantes"));
    participant_frame.set_child(Some(&participant_scroll));
    left.append(&participant_frame);

    let reset_btn = gtk::Button::with_label("Reiniciar todo");
    left.append(&reset_btn);

    // ----- Columna central: rueda + botón de sorteo -----
    let center = gtk::Box::new(Orientation::Vertical, 12);
    center.set_hexpand(true);

    let area = DrawingArea::builder()
        .content_width(380)
        .content_height(380)
        .hexpand(true)
        .vexpand(true)
        .build();
    center.append(&area);

    let draw_btn = gtk::Button::with_label("¡Sortear!");
    center.append(&draw_btn);

    let total_label = gtk::Label::new(Some("Total de entradas: 0"));
    center.append(&total_label);

    let status_label = gtk::Label::new(None);
    center.append(&status_label);

    // ----- Columna derecha: historial -----
    let history_list = gtk::ListBox::new();
    history_list.set_selection_mode(gtk::SelectionMode::None);
    let history_scroll = gtk::ScrolledWindow::builder()
        .hscrollbar_policy(gtk::PolicyType::Never)
        .min_content_height(400)
        .child(&history_list)
        .build();
    let history_frame = gtk::Frame::new(Some("Historial"));
    history_frame.set_width_request(260);
    history_frame.set_child(Some(&history_scroll));

    let main_box = gtk::Box::new(Orientation::Horizontal, 12);
    main_box.set_margin_top(12);
    main_box.set_margin_bottom(12);
    main_box.set_margin_start(12);
    main_box.set_margin_end(12);
    main_box.append(&left);
    main_box.append(&center);
    main_box.append(&history_frame);

    let controls = Controls {
        name_entry,
        entries_spin,
        save_btn,
        cancel_btn,
        participant_list,
        history_list,
        total_label,
        status_label,
        draw_btn,
        reset_btn,
        area: area.clone(),
    };

    // ----- Dibujo de la rueda -----
    let state_for_draw = state.clone();
    area.set_draw_func(move |_, cr, width, height| {
        // Snapshot del estado bajo lock; se dibuja fuera del préstamo.
        let (participants, total, rotation) = {
            let s = state_for_draw.lock().unwrap();
            (
                s.registry.snapshot(),
                s.registry.total_entries(),
                s.rotation,
            )
        };
        draw_wheel(cr, width, height, &participants, total, rotation);
    });

    // ----- Alta / edición desde el formulario -----
    let state_for_save = state.clone();
    let c_save = controls.clone();
    controls.save_btn.connect_clicked(move |_| {
        let name = c_save.name_entry.text().trim().to_string();
        let entries = c_save.entries_spin.value() as u32;
        if name.is_empty() {
            c_save.status_label.set_text("El nombre es obligatorio");
            return;
        }

        let (ok, was_edit) = {
            let mut s = state_for_save.lock().unwrap();
            match s.editing {
                Some(id) => {
                    let ok = s.registry.update(id, &name, entries);
                    if ok {
                        s.editing = None;
                    }
                    (ok, true)
                }
                None => (s.registry.add(&name, entries), false),
            }
        };

        if !ok {
            c_save
                .status_label
                .set_text("Ya existe un participante con ese nombre");
            return;
        }

        if was_edit {
            c_save.status_label.set_text("Participante actualizado");
        } else {
            c_save.status_label.set_text("Participante agregado");
        }
        reset_form(&c_save);
        refresh(&state_for_save, &c_save);
    });

    let state_for_cancel = state.clone();
    let c_cancel = controls.clone();
    controls.cancel_btn.connect_clicked(move |_| {
        state_for_cancel.lock().unwrap().editing = None;
        reset_form(&c_cancel);
    });

    // ----- Sorteo -----
    let state_for_spin = state.clone();
    let c_spin = controls.clone();
    controls.draw_btn.connect_clicked(move |_| {
        {
            let mut s = state_for_spin.lock().unwrap();
            if s.is_spinning() {
                return;
            }
            let snapshot = s.registry.snapshot();
            let Some(winner) = selector::select(&snapshot).cloned() else {
                return;
            };
            let Some(target) =
                animation::compute_target_rotation(&snapshot, winner.id, s.rotation)
            else {
                return;
            };

            s.spin = Some(SpinAnimation::new(s.rotation, target));
            s.spin_started_ms = util::now_ms();
            s.pending_winner = Some(winner);
        }
        c_spin.status_label.set_text("Girando...");
        refresh(&state_for_spin, &c_spin);
    });

    // ----- Reinicio total -----
    let state_for_reset = state.clone();
    let c_reset = controls.clone();
    controls.reset_btn.connect_clicked(move |_| {
        {
            let mut s = state_for_reset.lock().unwrap();
            if let Some(spin) = s.spin.as_mut() {
                spin.cancel();
            }
            s.spin = None;
            s.pending_winner = None;
            s.editing = None;
            s.rotation = 0.0;
            s.registry.reset();
        }
        reset_form(&c_reset);
        c_reset.status_label.set_text("Sorteo reiniciado");
        refresh(&state_for_reset, &c_reset);
    });

    // Timer de animación: avanza el giro en vuelo y repinta la rueda.
    let state_for_anim = state.clone();
    let c_anim = controls.clone();
    timeout_add_local(Duration::from_millis(16), move || {
        let mut ticked = false;
        let mut committed: Option<WinnerRecord> = None;
        {
            let mut s = state_for_anim.lock().unwrap();
            let started = s.spin_started_ms;
            let frame = s
                .spin
                .as_mut()
                .map(|spin| spin.frame(util::now_ms().saturating_sub(started)));

            if let Some(frame) = frame {
                s.rotation = animation::normalize_angle(frame.rotation);
                ticked = frame.tick;
                if frame.completed {
                    // Primero el commit, después el anuncio.
                    s.spin = None;
                    if let Some(winner) = s.pending_winner.take() {
                        committed = s.registry.commit(winner.id).ok();
                    }
                }
            }
        }

        if ticked {
            c_anim.area.display().beep();
        }
        if let Some(record) = committed {
            c_anim.status_label.set_text(&format!(
                "🎉 Ganador #{}: {} ({} entradas)",
                record.order, record.participant.name, record.participant.entries
            ));
            refresh(&state_for_anim, &c_anim);
        }
        c_anim.area.queue_draw();
        glib::ControlFlow::Continue
    });

    window.set_child(Some(&main_box));
    refresh(&state, &controls);
    window.present();
}

fn reset_form(c: &Controls) {
    c.name_entry.set_text("");
    c.entries_spin.set_value(1.0);
    c.save_btn.set_label("Agregar");
    c.cancel_btn.set_visible(false);
}

/// Reconstruye las listas y el estado de los botones a partir del registro.
fn refresh(state: &SharedApp, c: &Controls) {
    let (participants, winners, total, spinning) = {
        let s = state.lock().unwrap();
        (
            s.registry.snapshot(),
            s.registry.winners().to_vec(),
            s.registry.total_entries(),
            s.is_spinning(),
        )
    };

    clear_list(&c.participant_list);
    for p in &participants {
        c.participant_list
            .append(&participant_row(state, c, p, total, spinning));
    }

    clear_list(&c.history_list);
    for record in &winners {
        c.history_list.append(&history_row(record));
    }

    c.total_label
        .set_text(&format!("Total de entradas: {total}"));
    c.draw_btn
        .set_sensitive(!spinning && !participants.is_empty());
    c.reset_btn.set_sensitive(!spinning);
    c.area.queue_draw();
}

fn clear_list(list: &gtk::ListBox) {
    while let Some(child) = list.first_child() {
        list.remove(&child);
    }
}

fn participant_row(
    state: &SharedApp,
    c: &Controls,
    p: &Participant,
    total: u64,
    spinning: bool,
) -> gtk::Box {
    let row = gtk::Box::new(Orientation::Horizontal, 6);
    row.set_margin_top(4);
    row.set_margin_bottom(4);
    row.set_margin_start(6);
    row.set_margin_end(6);

    let name = gtk::Label::new(Some(&p.name));
    name.set_hexpand(true);
    name.set_xalign(0.0);

    let share = p.entries as f64 / total.max(1) as f64 * 100.0;
    let detail = gtk::Label::new(Some(&format!("{} ({:.1}%)", p.entries, share)));

    let edit_btn = gtk::Button::with_label("Editar");
    let remove_btn = gtk::Button::with_label("Quitar");
    edit_btn.set_sensitive(!spinning);
    remove_btn.set_sensitive(!spinning);

    let state_edit = state.clone();
    let c_edit = c.clone();
    let pid = p.id;
    let pname = p.name.clone();
    let pentries = p.entries;
    edit_btn.connect_clicked(move |_| {
        state_edit.lock().unwrap().editing = Some(pid);
        c_edit.name_entry.set_text(&pname);
        c_edit.entries_spin.set_value(pentries as f64);
        c_edit.save_btn.set_label("Guardar");
        c_edit.cancel_btn.set_visible(true);
    });

    let state_remove = state.clone();
    let c_remove = c.clone();
    remove_btn.connect_clicked(move |_| {
        let was_editing = {
            let mut s = state_remove.lock().unwrap();
            if s.is_spinning() {
                return;
            }
            s.registry.remove(pid);
            if s.editing == Some(pid) {
                s.editing = None;
                true
            } else {
                false
            }
        };
        if was_editing {
            reset_form(&c_remove);
        }
        refresh(&state_remove, &c_remove);
    });

    row.append(&name);
    row.append(&detail);
    row.append(&edit_btn);
    row.append(&remove_btn);
    row
}

fn history_row(record: &WinnerRecord) -> gtk::Box {
    let row = gtk::Box::new(Orientation::Horizontal, 6);
    row.set_margin_top(4);
    row.set_margin_bottom(4);
    row.set_margin_start(6);
    row.set_margin_end(6);

    let order = gtk::Label::new(Some(&format!("{}º", record.order)));
    let name = gtk::Label::new(Some(&record.participant.name));
    name.set_hexpand(true);
    name.set_xalign(0.0);
    let detail = gtk::Label::new(Some(&format!("{} entradas", record.participant.entries)));

    row.append(&order);
    row.append(&name);
    row.append(&detail);
    row
}

// =========================
// Dibujo de la rueda
// =========================

fn draw_wheel(
    cr: &Context,
    width: i32,
    height: i32,
    participants: &[Participant],
    total: u64,
    rotation: f64,
) {
    let w = width as f64;
    let h = height as f64;
    let cx = w / 2.0;
    let cy = h / 2.0;
    let radius = (w.min(h) / 2.0 - 24.0).max(40.0);

    // Fondo
    cr.set_source_rgb(1.0, 1.0, 1.0);
    cr.paint().unwrap();

    if participants.is_empty() || total == 0 {
        cr.set_source_rgb(0.96, 0.96, 0.96);
        cr.arc(cx, cy, radius, 0.0, std::f64::consts::TAU);
        cr.fill().unwrap();
        cr.set_source_rgb(0.0, 0.0, 0.0);
        cr.set_line_width(3.0);
        cr.arc(cx, cy, radius, 0.0, std::f64::consts::TAU);
        cr.stroke().unwrap();

        cr.set_source_rgb(0.45, 0.45, 0.45);
        cr.select_font_face("Sans", FontSlant::Normal, FontWeight::Bold);
        cr.set_font_size(14.0);
        if let Ok(ext) = cr.text_extents(EMPTY_WHEEL_TEXT) {
            cr.move_to(cx - ext.width() / 2.0, cy + ext.height() / 2.0);
            let _ = cr.show_text(EMPTY_WHEEL_TEXT);
        }
        draw_pointer(cr, cx, cy, radius);
        return;
    }

    // Porciones contiguas en orden de registro, desde la rotación actual
    let mut start = rotation.to_radians();
    for (i, p) in participants.iter().enumerate() {
        let slice = p.entries as f64 / total as f64 * std::f64::consts::TAU;
        let end = start + slice;
        let (r, g, b) = WHEEL_COLORS[i % WHEEL_COLORS.len()];

        cr.move_to(cx, cy);
        cr.arc(cx, cy, radius, start, end);
        cr.close_path();
        cr.set_source_rgb(r, g, b);
        cr.fill_preserve().unwrap();
        cr.set_source_rgb(0.0, 0.0, 0.0);
        cr.set_line_width(2.0);
        cr.stroke().unwrap();

        // Nombre sobre la porción, rotado hacia el centro
        let mid = start + slice / 2.0;
        let tx = cx + mid.cos() * radius * 0.65;
        let ty = cy + mid.sin() * radius * 0.65;
        cr.save().unwrap();
        cr.translate(tx, ty);
        cr.rotate(mid + std::f64::consts::FRAC_PI_2);
        cr.set_source_rgb(1.0, 1.0, 1.0);
        cr.select_font_face("Sans", FontSlant::Normal, FontWeight::Bold);
        cr.set_font_size(12.0);
        let display = truncate_name(&p.name);
        if let Ok(ext) = cr.text_extents(&display) {
            cr.move_to(-ext.width() / 2.0, ext.height() / 2.0);
            let _ = cr.show_text(&display);
        }
        cr.restore().unwrap();

        start = end;
    }

    // Centro blanco
    cr.arc(cx, cy, 20.0, 0.0, std::f64::consts::TAU);
    cr.set_source_rgb(1.0, 1.0, 1.0);
    cr.fill_preserve().unwrap();
    cr.set_source_rgb(0.0, 0.0, 0.0);
    cr.set_line_width(3.0);
    cr.stroke().unwrap();

    // Aro exterior
    cr.arc(cx, cy, radius, 0.0, std::f64::consts::TAU);
    cr.set_line_width(4.0);
    cr.stroke().unwrap();

    draw_pointer(cr, cx, cy, radius);
}

// Puntero fijo arriba (270° en el marco de dibujo)
fn draw_pointer(cr: &Context, cx: f64, cy: f64, radius: f64) {
    cr.move_to(cx - 14.0, cy - radius - 16.0);
    cr.line_to(cx + 14.0, cy - radius - 16.0);
    cr.line_to(cx, cy - radius + 10.0);
    cr.close_path();
    cr.set_source_rgb(0.1, 0.1, 0.1);
    cr.fill().unwrap();
}

fn truncate_name(name: &str) -> String {
    if name.chars().count() > 10 {
        let short: String = name.chars().take(10).collect();
        format!("{short}...")
    } else {
        name.to_string()
    }
}
