//! Memory Adventure entry point
//!
//! On the web this binds the game to the page's DOM. Natively it runs a
//! headless bot through a few levels, which is handy for checking timings.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlSelectElement};

    use memory_adventure::persistence::LocalStorageStore;
    use memory_adventure::platform::messages::{CLIPBOARD_FAILED, CLIPBOARD_OK};
    use memory_adventure::platform::{Popup, PopupChange, Tone, View, message_for, popup_for};
    use memory_adventure::sim::{ChoiceMark, CountdownKind, GamePhase};
    use memory_adventure::{Difficulty, Game, GameConfig, Intent, Symbol, share_text};

    /// Timer poll interval (ms)
    const FRAME_MS: i32 = 100;

    struct App {
        game: Game<LocalStorageStore>,
        last_time: f64,
    }

    impl App {
        fn new(seed: u64, difficulty: Difficulty) -> Self {
            Self {
                game: Game::new(seed, GameConfig::default(), LocalStorageStore)
                    .with_difficulty(difficulty),
                last_time: 0.0,
            }
        }

        fn dispatch(&mut self, intent: Intent) {
            self.game.handle(intent);
            self.flush();
        }

        /// Feed elapsed wall time to the game
        fn update(&mut self, now: f64) {
            if self.last_time <= 0.0 {
                self.last_time = now;
                return;
            }
            // Whole milliseconds only; the fraction carries to the next poll
            let dt = (now - self.last_time).max(0.0).floor();
            self.last_time += dt;
            self.game.tick(dt.min(u32::MAX as f64) as u32);
            self.flush();
        }

        /// Apply pending events, then redraw
        fn flush(&mut self) {
            let events = self.game.drain_events();
            if events.is_empty() {
                return;
            }
            let Some(document) = document() else {
                return;
            };
            // Later events overwrite earlier messages (a final wrong pick is
            // followed by the loss message)
            for event in &events {
                if let Some(message) = message_for(event) {
                    set_message(&document, &message.text, message.tone);
                }
                match popup_for(event) {
                    Some(PopupChange::Show(popup)) => show_popup(&document, &popup),
                    Some(PopupChange::Hide) => hide_popup(&document),
                    None => {}
                }
            }
            render(&document, &View::capture(&self.game));
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(el: &Element, hidden: bool) {
        let _ = el.class_list().toggle_with_force("hidden", hidden);
    }

    fn set_message(document: &Document, text: &str, tone: Tone) {
        if let Some(el) = document.get_element_by_id("message") {
            el.set_text_content(Some(text));
            let _ = el.set_attribute("data-tone", tone.as_class());
        }
    }

    fn show_popup(document: &Document, popup: &Popup) {
        let Some(el) = document.get_element_by_id("status-popup") else {
            return;
        };
        let _ = el.set_attribute("class", &format!("status-popup {}", popup.kind));
        if let Some(text) = el.query_selector(".status-text").ok().flatten() {
            text.set_text_content(Some(&popup.text));
        }
        if let Some(actions) = document.get_element_by_id("status-actions") {
            let html: String = popup
                .actions
                .iter()
                .map(|(action, label)| {
                    format!(
                        r#"<button type="button" class="popup-btn {id}" data-action="{id}">{label}</button>"#,
                        id = action.id()
                    )
                })
                .collect();
            actions.set_inner_html(&html);
        }
    }

    fn hide_popup(document: &Document) {
        if let Some(el) = document.get_element_by_id("status-popup") {
            let _ = el.set_attribute("class", "status-popup hidden");
        }
        if let Some(actions) = document.get_element_by_id("status-actions") {
            actions.set_inner_html("");
        }
    }

    fn render(document: &Document, view: &View) {
        set_text(document, "current-level", &view.level.to_string());
        set_text(document, "best-score", &view.best_score.to_string());
        set_text(document, "countdown-value", &view.countdown.remaining.to_string());

        if let Some(circle) = document.query_selector(".countdown-circle").ok().flatten() {
            let classes = circle.class_list();
            let _ = classes.toggle_with_force("warning", view.countdown.warning);
            let _ = classes.toggle_with_force(
                "mode-select",
                view.countdown.active && view.countdown.kind == CountdownKind::Select,
            );
        }

        // Face-down cards never carry their symbol into the DOM
        if let Some(cards) = document.get_element_by_id("card-list") {
            let html: String = match &view.sequence {
                Some(sequence) => sequence
                    .iter()
                    .map(|glyph| format!(r#"<div class="card" data-emoji="{glyph}">{glyph}</div>"#))
                    .collect(),
                None => (0..view.card_count)
                    .map(|_| r#"<div class="card covered" aria-hidden="true"></div>"#.to_string())
                    .collect(),
            };
            cards.set_inner_html(&html);
        }

        if let Some(choices) = document.query_selector(".choices").ok().flatten() {
            let html: String = view
                .choices
                .iter()
                .map(|choice| {
                    let (class, result) = match choice.mark {
                        ChoiceMark::Untouched => ("", ""),
                        ChoiceMark::Hit => (" choice-success", "◎"),
                        ChoiceMark::Miss => (" choice-fail", "×"),
                    };
                    let disabled = if choice.enabled { "" } else { " disabled" };
                    format!(
                        r#"<button type="button" class="choice-btn{class}" data-emoji="{g}" data-result="{result}"{disabled}>{g}</button>"#,
                        g = choice.glyph
                    )
                })
                .collect();
            choices.set_inner_html(&html);
        }

        if let Some(list) = document.get_element_by_id("selection-list") {
            let html: String = if view.history.is_empty() {
                r#"<span class="selection-chip placeholder">未選択</span>"#.to_string()
            } else {
                view.history
                    .iter()
                    .map(|glyph| format!(r#"<span class="selection-chip">{glyph}</span>"#))
                    .collect()
            };
            list.set_inner_html(&html);
        }

        if let Some(overlay) = document.get_element_by_id("start-overlay") {
            set_hidden(&overlay, view.phase != GamePhase::Idle);
        }
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            set_hidden(&btn, !view.can_restart());
        }
    }

    fn share(summary: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let text = share_text(summary);
        let promise = window.navigator().clipboard().write_text(&text);
        wasm_bindgen_futures::spawn_local(async move {
            let result = wasm_bindgen_futures::JsFuture::from(promise).await;
            let Some(document) = document() else {
                return;
            };
            match result {
                Ok(_) => set_message(&document, CLIPBOARD_OK, Tone::Success),
                Err(e) => {
                    log::warn!("Clipboard write failed: {:?}", e);
                    set_message(&document, CLIPBOARD_FAILED, Tone::Error);
                }
            }
        });
    }

    fn selected_difficulty(document: &Document) -> Difficulty {
        document
            .get_element_by_id("difficulty-select")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
            .map(|select| Difficulty::from_str_or_default(&select.value()))
            .unwrap_or_default()
    }

    /// data-* value of the closest ancestor matching `selector`
    fn delegated_attr(event: &web_sys::Event, selector: &str, attr: &str) -> Option<String> {
        let target: Element = event.target()?.dyn_into().ok()?;
        target.closest(selector).ok()??.get_attribute(attr)
    }

    fn on_click(document: &Document, id: &str, app: Rc<RefCell<App>>, intent: Intent) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().dispatch(intent);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_input_handlers(document: &Document, app: Rc<RefCell<App>>) {
        on_click(document, "start-btn", app.clone(), Intent::Start);
        on_click(document, "restart-btn", app.clone(), Intent::Restart);
        on_click(document, "end-game-btn", app.clone(), Intent::EndSession);

        // Difficulty selector: any change starts a fresh game
        if let Some(select) = document.get_element_by_id("difficulty-select") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(document) = document() else {
                    return;
                };
                let difficulty = selected_difficulty(&document);
                app.borrow_mut().dispatch(Intent::ChangeDifficulty(difficulty));
            });
            let _ = select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Choice buttons are redrawn every frame, so listen on the container
        if let Some(choices) = document.query_selector(".choices").ok().flatten() {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                let symbol = delegated_attr(&event, ".choice-btn", "data-emoji")
                    .and_then(|glyph| Symbol::from_glyph(&glyph));
                if let Some(symbol) = symbol {
                    app.borrow_mut().dispatch(Intent::Pick(symbol));
                }
            });
            let _ = choices.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Popup buttons
        if let Some(actions) = document.get_element_by_id("status-actions") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                match delegated_attr(&event, ".popup-btn", "data-action").as_deref() {
                    Some("restart") => app.borrow_mut().dispatch(Intent::Restart),
                    Some("share") => {
                        let summary = app.borrow().game.summary();
                        share(&summary);
                    }
                    _ => {}
                }
            });
            let _ = actions.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn start_timer_loop(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut()>::new(move || {
            app.borrow_mut().update(js_sys::Date::now());
        });
        let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            FRAME_MS,
        );
        closure.forget();
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Memory Adventure starting...");

        let Some(document) = document() else {
            log::error!("No document; nothing to bind to");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(seed, selected_difficulty(&document))));
        log::info!("Game initialized with seed: {}", seed);

        render(&document, &View::capture(&app.borrow().game));
        setup_input_handlers(&document, app.clone());
        start_timer_loop(app);

        log::info!("Memory Adventure running!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;

    use memory_adventure::consts::TICK_MS;
    use memory_adventure::persistence::MemoryStore;
    use memory_adventure::platform::message_for;
    use memory_adventure::sim::{GamePhase, Symbol};
    use memory_adventure::{ConfigError, Difficulty, Game, GameConfig, Intent, share_text};

    #[derive(Parser, Debug)]
    #[command(name = "memory-adventure", about = "Headless Memory Adventure run with a perfect-recall bot")]
    pub struct Cli {
        /// easy, medium or hard
        #[arg(short, long, default_value = "easy")]
        difficulty: String,

        /// RNG seed (defaults to the current time)
        #[arg(short, long)]
        seed: Option<u64>,

        /// JSON file overriding timings and counts
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// End the session after clearing this many levels
        #[arg(short, long, default_value_t = 5)]
        levels: u32,

        /// Pretend this value was already stored as the best score
        #[arg(long)]
        stored_best: Option<String>,
    }

    pub fn run(cli: Cli) -> Result<(), ConfigError> {
        let config = match &cli.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        let seed = cli.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
        let store = cli.stored_best.map(MemoryStore::with_value).unwrap_or_default();
        let difficulty = Difficulty::from_str_or_default(&cli.difficulty);

        let mut game = Game::new(seed, config, store).with_difficulty(difficulty);
        log::info!("Headless run: {} seed={}", difficulty.as_str(), seed);

        game.handle(Intent::Start);
        let mut recalled: Vec<Symbol> = Vec::new();
        loop {
            for event in game.drain_events() {
                log::debug!("{event:?}");
                if let Some(message) = message_for(&event) {
                    if !message.text.is_empty() {
                        println!("[Lv{}] {}", game.level(), message.text);
                    }
                }
            }

            match game.phase() {
                GamePhase::Memorizing => {
                    if let Some(sequence) = game.state().visible_sequence() {
                        recalled = sequence.to_vec();
                    }
                    game.tick(TICK_MS);
                }
                GamePhase::Selecting if game.level() > cli.levels => {
                    game.handle(Intent::EndSession);
                }
                GamePhase::Selecting => match recalled.pop() {
                    Some(symbol) => game.handle(Intent::Pick(symbol)),
                    None => game.tick(TICK_MS),
                },
                GamePhase::RoundWon => game.tick(TICK_MS),
                GamePhase::Idle | GamePhase::RoundLost | GamePhase::SessionEnded => break,
            }
        }

        println!();
        println!("{}", share_text(&game.summary()));
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    let cli = headless::Cli::parse();
    if let Err(e) = headless::run(cli) {
        eprintln!("memory-adventure: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
