use crate::utils::*;
use bitflags::bitflags;
use gloo::timers::callback::Interval;
use minado_core as game;
use yew::prelude::*;

const TICK_MILLIS: u32 = 1000;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq)]
    struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct CellPointerState {
    pos: game::Coord2,
    buttons: MouseButtons,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum CellMsg {
    Update(CellPointerState),
    Leave,
    DoubleClick(game::Coord2),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    CellEvent(CellMsg),
    Tick,
    NewGame,
    SetDifficulty(game::Difficulty),
}

fn status_message(event: game::GameEvent) -> &'static str {
    match event {
        game::GameEvent::Lost => "Game over! You hit a mine.",
        game::GameEvent::Won => "Congratulations, you won!",
    }
}

fn cell_label(cell_view: game::CellView) -> String {
    use game::CellView::*;
    match cell_view {
        Revealed(0) | Hidden | Mine | TriggeredMine => String::new(),
        Revealed(count) => count.to_string(),
        Flagged => "🚩".to_string(),
    }
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    x: game::Coord,
    y: game::Coord,
    cell_view: game::CellView,
    #[prop_or_default]
    pressed: bool,
    callback: Callback<CellMsg>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    use game::CellView::*;

    let CellProps {
        x,
        y,
        cell_view,
        pressed,
        callback,
    } = props.clone();

    let mut class = classes!(
        "cell",
        match cell_view {
            Hidden => classes!(),
            Revealed(count) => classes!("open", format!("num-{}", count)),
            Flagged => classes!("flag"),
            Mine => classes!("open", "mine"),
            TriggeredMine => classes!("open", "mine", "oops"),
        }
    );
    if pressed {
        class.push("open");
    }

    let pointer_update = |kind: &'static str| {
        let callback = callback.clone();
        Callback::from(move |e: MouseEvent| {
            let buttons = MouseButtons::from_bits_truncate(e.buttons());
            let pointer_state = CellPointerState {
                pos: (x, y),
                buttons,
            };
            callback.emit(CellMsg::Update(pointer_state));
            log::trace!("({}, {}) mouse {} ({:?})", x, y, kind, buttons);
        })
    };
    let onmousedown = pointer_update("down");
    let onmouseup = pointer_update("up");
    let onmouseenter = pointer_update("enter");

    let onmouseleave = {
        let callback = callback.clone();
        Callback::from(move |_: MouseEvent| {
            callback.emit(CellMsg::Leave);
            log::trace!("({}, {}) mouse leave", x, y);
        })
    };

    let ondblclick = {
        let callback = callback.clone();
        Callback::from(move |_: MouseEvent| {
            callback.emit(CellMsg::DoubleClick((x, y)));
            log::trace!("({}, {}) double click", x, y);
        })
    };

    html! {
        <td {class} {onmousedown} {onmouseup} {onmouseenter} {onmouseleave} {ondblclick}>
            {cell_label(cell_view)}
        </td>
    }
}

#[derive(Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    pub(crate) seed: Option<u64>,
    pub(crate) difficulty: game::Difficulty,
}

#[derive(Debug)]
pub(crate) struct GameView {
    session: game::GameSession,
    last_event: Option<game::GameEvent>,
    current_cell_state: Option<CellPointerState>,
    tick_interval: Option<Interval>,
}

impl GameView {
    fn get_game_state(&self) -> game::GameState {
        self.session.state()
    }

    fn is_mid_open(&self) -> bool {
        matches!(
            self.current_cell_state,
            Some(CellPointerState {
                buttons: MouseButtons::LEFT,
                ..
            })
        )
    }

    fn get_game_state_class(&self) -> Classes {
        use game::GameState::*;
        let mid_open = self.is_mid_open();
        classes!(match self.get_game_state() {
            NotStarted | InProgress if mid_open => "mid-open",
            NotStarted => "not-started",
            InProgress => "in-progress",
            Won => "win",
            Lost => "lose",
        })
    }

    fn apply_reveal(&mut self, result: game::Result<game::RevealOutcome>) -> bool {
        if let Ok(outcome) = result {
            if let Some(event) = outcome.event() {
                self.notify(event);
            }
        }
        result.has_update()
    }

    fn notify(&mut self, event: game::GameEvent) {
        log::info!("game finished: {:?}", event);
        self.last_event = Some(event);
        gloo::dialogs::alert(status_message(event));
    }

    /// Left click: reveal a hidden cell, or chord a revealed one when its flags are satisfied.
    fn reveal_cell(&mut self, coords: game::Coord2) -> bool {
        use game::CellView::*;

        let result = match self.session.cell_view(coords) {
            Hidden => self.session.reveal(coords),
            Revealed(_) if self.session.can_chord_reveal_at(coords) => {
                self.session.chord_reveal(coords)
            }
            _ => Ok(game::RevealOutcome::NoChange),
        };
        self.apply_reveal(result)
    }

    fn chord_cell(&mut self, coords: game::Coord2) -> bool {
        let result = self.session.chord_reveal(coords);
        self.apply_reveal(result)
    }

    fn mark_cell(&mut self, coords: game::Coord2) -> bool {
        self.session.toggle_flag(coords).has_update()
    }

    /// Keeps the one-second tick scheduled exactly while the session clock runs.
    fn sync_timer(&mut self, ctx: &Context<Self>) {
        match (self.session.is_ticking(), self.tick_interval.is_some()) {
            (true, false) => {
                log::debug!("timer started");
                let link = ctx.link().clone();
                self.tick_interval = Some(Interval::new(TICK_MILLIS, move || {
                    link.send_message(Msg::Tick)
                }));
            }
            (false, true) => {
                log::debug!("timer cancelled");
                // dropping the interval clears it
                self.tick_interval = None;
            }
            _ => {}
        }
    }

    fn is_pressed(&self, coords: game::Coord2, cell_view: game::CellView) -> bool {
        use game::CellView::*;

        if self.get_game_state().is_final() {
            return false;
        }

        match (self.current_cell_state, cell_view) {
            (None, _) => false,
            (_, Flagged | Revealed(_) | Mine | TriggeredMine) => false,
            (
                Some(CellPointerState {
                    pos,
                    buttons: MouseButtons::LEFT,
                }),
                Hidden,
            ) if pos == coords => true,
            (
                Some(CellPointerState {
                    pos,
                    buttons: MouseButtons::LEFT,
                }),
                Hidden,
            ) if game::is_within_one(pos, coords) => self.session.can_chord_reveal_at(pos),
            _ => false,
        }
    }

    fn view_difficulty_selector(&self, ctx: &Context<Self>) -> Html {
        let current = self.session.difficulty();
        html! {
            <header>
                {
                    for game::Difficulty::ALL.into_iter().map(|difficulty| {
                        let class = classes!((difficulty == current).then_some("selected"));
                        let onclick = ctx.link().callback(move |_: MouseEvent| Msg::SetDifficulty(difficulty));
                        html! {
                            <button {class} {onclick}>{difficulty.label()}</button>
                        }
                    })
                }
            </header>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let seed = props.seed.unwrap_or_else(js_random_seed);
        Self {
            session: game::GameSession::new(props.difficulty, seed),
            last_event: None,
            current_cell_state: None,
            tick_interval: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use CellMsg::*;
        use Msg::*;

        let updated = match msg {
            CellEvent(Leave) => {
                log::trace!("cell leave");
                self.current_cell_state.take().is_some()
            }
            CellEvent(DoubleClick(pos)) => {
                log::debug!("chord reveal: {:?}", pos);
                self.chord_cell(pos)
            }
            CellEvent(Update(cell_state)) => {
                log::trace!("cell update: {:?}", cell_state);
                if cell_state.buttons.is_empty() {
                    // all mouse buttons were released, act on whichever single button was held
                    match self.current_cell_state.take() {
                        None => false,
                        Some(CellPointerState { pos, buttons }) => match buttons {
                            MouseButtons::LEFT => {
                                log::debug!("reveal cell: {:?}", pos);
                                self.reveal_cell(pos);
                                true
                            }
                            MouseButtons::RIGHT => {
                                log::debug!("flag cell: {:?}", pos);
                                self.mark_cell(pos);
                                true
                            }
                            // several buttons at once is a cancel, redraw to unpress cells
                            _ => true,
                        },
                    }
                } else {
                    match self.current_cell_state.replace(cell_state) {
                        None => true,
                        Some(CellPointerState { pos, buttons }) => {
                            (pos != cell_state.pos)
                                || ((buttons & MouseButtons::LEFT)
                                    != (cell_state.buttons & MouseButtons::LEFT))
                        }
                    }
                }
            }
            Tick => self.session.tick(),
            NewGame => {
                self.session.reset();
                self.last_event = None;
                true
            }
            SetDifficulty(difficulty) => {
                let changed = self.session.set_difficulty(difficulty);
                if changed {
                    log::debug!("difficulty changed to {}", difficulty);
                    self.last_event = None;
                }
                changed
            }
        };

        self.sync_timer(ctx);
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let (cols, rows) = self.session.size();
        let game_state_class = self.get_game_state_class();
        let flags_left = format_for_counter(self.session.flags_remaining());
        let elapsed_time = format_time(self.session.elapsed_seconds());
        let playable = !self.get_game_state().is_final();

        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            NewGame
        });

        html! {
            <div class="minado" oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                {self.view_difficulty_selector(ctx)}
                <nav>
                    <aside class="flags">{flags_left}</aside>
                    <span><button class={game_state_class} onclick={cb_new_game}/></span>
                    <aside class="clock">{elapsed_time}</aside>
                </nav>
                <table class={playable.then_some("playable")}>
                    {
                        for (0..rows).map(|y| html! {
                            <tr>
                                {
                                    for (0..cols).map(|x| {
                                        let cell_view = self.session.cell_view((x, y));
                                        let pressed = self.is_pressed((x, y), cell_view);
                                        let callback = ctx.link().callback(Msg::CellEvent);
                                        html! {
                                            <CellView {x} {y} {cell_view} {callback} {pressed}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                if let Some(event) = self.last_event {
                    <p class="status">{status_message(event)}</p>
                }
            </div>
        }
    }
}
