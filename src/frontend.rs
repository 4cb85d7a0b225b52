use gloo_timers::callback::Timeout;
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast};
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    window, AddEventListenerOptions, HtmlElement, HtmlInputElement, HtmlTextAreaElement,
    InputEvent, MouseEvent, ScrollBehavior, ScrollToOptions, Storage, SubmitEvent, WheelEvent,
};
use yew::prelude::*;

use crate::api::{ContentClient, PageRequest, Sorting};
use crate::contact::{self, ContactField, ContactSubmission};
use crate::layout::{variant_for_index, LayoutVariant, MediaSide, MockupKind};
use crate::model::{DisplayItem, ExperienceRecord, MediaAsset, TechEntry, TechStackRecord};
use crate::scroll::{
    SlideDirection, SnapTimings, StackController, WheelDecision, DEFAULT_SNAP_DEBOUNCE_MS,
    DEFAULT_SNAP_DURATION_MS, DEFAULT_TRANSITION_SETTLE_MS,
};

const THEME_KEY: &str = "stackfolio-theme";
const MOBILE_MEDIA_QUERY: &str = "(max-width: 768px)";
const TOAST_DISMISS_MS: u32 = 4_000;
const FALLBACK_VIEWPORT_HEIGHT: f64 = 720.0;

// The settle window splits into an exit leg and an enter leg so only one card
// is ever present.
const CARD_EXIT_MS: u32 = 250;
const CARD_SETTLE_MS: u32 = DEFAULT_TRANSITION_SETTLE_MS as u32;
const SNAP_DEBOUNCE_MS: u32 = DEFAULT_SNAP_DEBOUNCE_MS as u32;
const SNAP_DURATION_MS: u32 = DEFAULT_SNAP_DURATION_MS as u32;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Theme {
    Light,
    Dark,
}

impl Theme {
    fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    fn from_str(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Self::Light => "◐",
            Self::Dark => "◑",
        }
    }
}

fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok().flatten()
}

fn media_query_matches(query: &str) -> bool {
    window()
        .and_then(|win| win.match_media(query).ok().flatten())
        .map(|media| media.matches())
        .unwrap_or(false)
}

fn resolve_theme() -> Theme {
    let stored = local_storage()
        .and_then(|storage| storage.get_item(THEME_KEY).ok().flatten())
        .and_then(|value| Theme::from_str(&value));

    stored.unwrap_or_else(|| {
        if media_query_matches("(prefers-color-scheme: dark)") {
            Theme::Dark
        } else {
            Theme::Light
        }
    })
}

fn apply_theme(theme: Theme) {
    if let Some(root) = window()
        .and_then(|win| win.document())
        .and_then(|document| document.document_element())
    {
        let _ = root.set_attribute("data-theme", theme.as_str());
    }
}

fn persist_theme(theme: Theme) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(THEME_KEY, theme.as_str());
    }
}

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

fn page_scroll_y() -> f64 {
    window().and_then(|win| win.scroll_y().ok()).unwrap_or(0.0)
}

fn viewport_height() -> f64 {
    window()
        .and_then(|win| win.inner_height().ok())
        .and_then(|value| value.as_f64())
        .unwrap_or(FALLBACK_VIEWPORT_HEIGHT)
}

fn smooth_scroll_to(top: f64) {
    let Some(win) = window() else {
        return;
    };

    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    win.scroll_to_with_scroll_to_options(&options);
}

enum FetchState<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

#[derive(Clone, PartialEq)]
struct ToastMessage {
    ok: bool,
    text: String,
}

#[derive(Clone, PartialEq)]
enum CardStage {
    Steady { index: usize },
    Leaving { from: usize, direction: SlideDirection },
    Entering { index: usize, direction: SlideDirection },
}

fn enter_class(direction: SlideDirection) -> &'static str {
    match direction {
        SlideDirection::Forward => "card-enter-from-below",
        SlideDirection::Backward => "card-enter-from-above",
    }
}

fn exit_class(direction: SlideDirection) -> &'static str {
    match direction {
        SlideDirection::Forward => "card-exit-upward",
        SlideDirection::Backward => "card-exit-downward",
    }
}

#[derive(Properties, PartialEq)]
struct ItemLinkProps {
    href: AttrValue,
    label: AttrValue,
}

#[function_component(ItemLink)]
fn item_link(props: &ItemLinkProps) -> Html {
    html! {
        <a class="item-link" href={props.href.clone()} target="_blank" rel="noopener noreferrer">
            {props.label.clone()}
            <span class="external-mark" aria-hidden="true">{"↗"}</span>
            <span class="sr-only">{" (opens in a new tab)"}</span>
        </a>
    }
}

#[derive(Properties, PartialEq)]
struct StatusBadgesProps {
    item: DisplayItem,
}

#[function_component(StatusBadges)]
fn status_badges(props: &StatusBadgesProps) -> Html {
    let (Some(development), Some(progress)) =
        (props.item.development_status, props.item.progress_status)
    else {
        return Html::default();
    };

    html! {
        <div class="status-badges">
            <span class={classes!("badge", development.css_class())} title={development.caption()}>
                <span aria-hidden="true">{development.icon()}</span>
                {development.as_str()}
            </span>
            <span class={classes!("badge", progress.css_class())}>
                <span aria-hidden="true">{progress.icon()}</span>
                {progress.as_str()}
            </span>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ProgressBarProps {
    value: u8,
    label: AttrValue,
}

#[function_component(ProgressBar)]
fn progress_bar(props: &ProgressBarProps) -> Html {
    html! {
        <div class="progress">
            <div class="progress-caption">
                <span>{props.label.clone()}</span>
                <span>{format!("{}%", props.value)}</span>
            </div>
            <div class="progress-track" role="progressbar" aria-valuenow={props.value.to_string()} aria-valuemin="0" aria-valuemax="100">
                <div class="progress-fill" style={format!("width: {}%;", props.value)} />
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct TechStripProps {
    entries: Vec<TechEntry>,
}

#[function_component(TechStrip)]
fn tech_strip(props: &TechStripProps) -> Html {
    html! {
        <ul class="tech-strip">
            { for props.entries.iter().map(|entry| html! {
                <li key={entry.name.clone()} class="tech-chip" title={entry.name.clone()}>
                    if let Some(icon_url) = entry.icon_url.clone() {
                        <img src={icon_url} alt={entry.name.clone()} loading="lazy" />
                    } else {
                        <span aria-hidden="true">{entry.name.chars().next().unwrap_or('?').to_string()}</span>
                    }
                    <span class="tech-chip-name">{entry.name.clone()}</span>
                </li>
            }) }
        </ul>
    }
}

#[derive(Properties, PartialEq)]
struct MockupProps {
    kind: MockupKind,
    media: Vec<MediaAsset>,
    title: AttrValue,
    on_media_click: Callback<()>,
}

#[function_component(Mockup)]
fn mockup(props: &MockupProps) -> Html {
    let Some(first) = props.media.first().cloned() else {
        return html! {
            <div class="mockup mockup-empty">
                <p>{"No Images Available"}</p>
            </div>
        };
    };

    let onclick = {
        let on_media_click = props.on_media_click.clone();
        Callback::from(move |_: MouseEvent| on_media_click.emit(()))
    };

    html! {
        <figure class={classes!("mockup", format!("mockup-{}", props.kind.as_str()))}>
            if props.kind != MockupKind::Phone {
                <div class="mockup-chrome" aria-hidden="true">
                    <span /><span /><span />
                </div>
            }
            <button type="button" class="mockup-screen" onclick={onclick} aria-label={format!("Open the {} gallery", props.title)}>
                <img src={first.src} alt={first.alt} loading="lazy" />
            </button>
            if props.media.len() > 1 {
                <figcaption class="mockup-count">{format!("{} images", props.media.len())}</figcaption>
            }
        </figure>
    }
}

#[derive(Properties, PartialEq)]
struct MediaCarouselProps {
    assets: Vec<MediaAsset>,
    on_close: Callback<()>,
}

#[function_component(MediaCarousel)]
fn media_carousel(props: &MediaCarouselProps) -> Html {
    let position = use_state(|| 0usize);
    let count = props.assets.len();

    if count == 0 {
        return Html::default();
    }

    let current = props.assets[(*position).min(count - 1)].clone();

    let on_backdrop = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };
    let on_close_button = {
        let on_close = props.on_close.clone();
        Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            on_close.emit(());
        })
    };
    let on_previous = {
        let position = position.clone();
        Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            position.set((*position + count - 1) % count);
        })
    };
    let on_next = {
        let position = position.clone();
        Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            position.set((*position + 1) % count);
        })
    };
    let stop_bubbling = Callback::from(|event: MouseEvent| event.stop_propagation());

    html! {
        <div class="overlay carousel-overlay" onclick={on_backdrop}>
            <div class="carousel" onclick={stop_bubbling}>
                <button type="button" class="overlay-close" onclick={on_close_button} aria-label="Close gallery">{"✕"}</button>
                <img class="carousel-image" src={current.src} alt={current.alt} />
                if count > 1 {
                    <div class="carousel-controls">
                        <button type="button" onclick={on_previous} aria-label="Previous image">{"‹"}</button>
                        <span class="carousel-position">{format!("{} / {}", (*position).min(count - 1) + 1, count)}</span>
                        <button type="button" onclick={on_next} aria-label="Next image">{"›"}</button>
                    </div>
                }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ItemDetailModalProps {
    item: DisplayItem,
    on_close: Callback<()>,
}

#[function_component(ItemDetailModal)]
fn item_detail_modal(props: &ItemDetailModalProps) -> Html {
    let on_backdrop = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };
    let on_close_button = {
        let on_close = props.on_close.clone();
        Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            on_close.emit(());
        })
    };
    let stop_bubbling = Callback::from(|event: MouseEvent| event.stop_propagation());
    let item = &props.item;

    html! {
        <div class="overlay modal-overlay" onclick={on_backdrop}>
            <div class="modal" role="dialog" aria-modal="true" aria-label={item.title.clone()} onclick={stop_bubbling}>
                <button type="button" class="overlay-close" onclick={on_close_button} aria-label="Close description">{"✕"}</button>
                <h2>{format!("{} - {}", item.title, item.subtitle)}</h2>
                <StatusBadges item={item.clone()} />
                <p class="modal-description">{item.description.clone()}</p>
                if !item.features.is_empty() {
                    <h3>{"Features"}</h3>
                    <ul class="feature-list">
                        { for item.features.iter().map(|feature| html! {
                            <li key={feature.text.clone()}>
                                <span aria-hidden="true">{feature.icon.clone()}</span>
                                <span>{feature.text.clone()}</span>
                            </li>
                        }) }
                    </ul>
                }
                if !item.tech_stack.is_empty() {
                    <h3>{"Tech Stack"}</h3>
                    <TechStrip entries={item.tech_stack.clone()} />
                }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct CardViewProps {
    item: DisplayItem,
    variant: LayoutVariant,
    on_open_modal: Callback<DisplayItem>,
    on_open_carousel: Callback<Vec<MediaAsset>>,
}

#[function_component(CardView)]
fn card_view(props: &CardViewProps) -> Html {
    let item = props.item.clone();
    let variant = props.variant;

    let header = html! {
        <div class="card-header">
            <h2>
                {item.title.clone()}
                if !item.subtitle.is_empty() {
                    <span class="card-subtitle">{format!(" - {}", item.subtitle)}</span>
                }
            </h2>
            <div class="card-links">
                if let Some(repository_url) = item.links.repository_url.clone() {
                    <ItemLink href={repository_url} label="Source" />
                }
                if let Some(live_url) = item.links.live_url.clone() {
                    <ItemLink href={live_url} label="Live" />
                }
            </div>
        </div>
    };

    let badges = html! {
        <div class="card-badges">
            <span class="badge badge-category">{item.category.clone().unwrap_or_else(|| "Other".to_string())}</span>
            <StatusBadges item={item.clone()} />
        </div>
    };

    let description = {
        let show_full = item.description_is_truncated();
        let on_show_full = {
            let on_open_modal = props.on_open_modal.clone();
            let item = item.clone();
            Callback::from(move |_: MouseEvent| on_open_modal.emit(item.clone()))
        };
        html! {
            <div class="card-description">
                <p>{item.description_preview()}</p>
                if show_full {
                    <button type="button" class="show-full" onclick={on_show_full}>
                        {"Show Full Description"}
                    </button>
                }
            </div>
        }
    };

    let features = html! {
        <div class="card-features">
            <ProgressBar value={item.progress_percentage} label="Progress" />
            <ul class="feature-list">
                { for item.features.iter().map(|feature| html! {
                    <li key={feature.text.clone()}>
                        <span aria-hidden="true">{feature.icon.clone()}</span>
                        <span>{feature.text.clone()}</span>
                    </li>
                }) }
            </ul>
        </div>
    };

    let media = {
        let on_media_click = {
            let on_open_carousel = props.on_open_carousel.clone();
            let assets = item.media.clone();
            Callback::from(move |_: ()| on_open_carousel.emit(assets.clone()))
        };
        html! {
            <Mockup
                kind={variant.mockup()}
                media={item.media.clone()}
                title={item.title.clone()}
                on_media_click={on_media_click}
            />
        }
    };

    let tech = html! { <TechStrip entries={item.tech_stack.clone()} /> };

    let media_column = html! {
        <div class="stack-media">
            if variant.badges_with_media() {
                {badges.clone()}
            }
            {media}
            {tech}
        </div>
    };

    match variant.media_side() {
        MediaSide::Left => html! {
            <div class={classes!("stack-grid", variant.css_class())}>
                {media_column}
                <div class="stack-content">
                    {header}
                    if !variant.badges_with_media() { {badges} }
                    {description}
                    {features}
                </div>
            </div>
        },
        MediaSide::Right => html! {
            <div class={classes!("stack-grid", variant.css_class())}>
                <div class="stack-content">
                    {header}
                    if !variant.badges_with_media() { {badges} }
                    {description}
                    {features}
                </div>
                {media_column}
            </div>
        },
        MediaSide::Center => html! {
            <div class={classes!("stack-grid", variant.css_class())}>
                <div class="stack-content">
                    {header}
                    {description}
                </div>
                {media_column}
                <div class="stack-content stack-content-aside">
                    {features}
                </div>
            </div>
        },
    }
}

#[derive(Properties, PartialEq)]
struct MobileStackProps {
    items: Vec<DisplayItem>,
}

#[function_component(MobileStack)]
fn mobile_stack(props: &MobileStackProps) -> Html {
    html! {
        <div class="mobile-stack">
            { for props.items.iter().map(|item| html! {
                <article key={item.id.clone()} class="mobile-card">
                    <div class="card-header">
                        <h2>{item.title.clone()}</h2>
                        <div class="card-links">
                            if let Some(repository_url) = item.links.repository_url.clone() {
                                <ItemLink href={repository_url} label="Source" />
                            }
                            if let Some(live_url) = item.links.live_url.clone() {
                                <ItemLink href={live_url} label="Live" />
                            }
                        </div>
                    </div>
                    <StatusBadges item={item.clone()} />
                    if !item.subtitle.is_empty() {
                        <h3 class="card-subtitle">{item.subtitle.clone()}</h3>
                    }
                    <p>{item.description.clone()}</p>
                    if !item.features.is_empty() {
                        <ul class="feature-list">
                            { for item.features.iter().map(|feature| html! {
                                <li key={feature.text.clone()}>
                                    <span aria-hidden="true">{feature.icon.clone()}</span>
                                    <span>{feature.text.clone()}</span>
                                </li>
                            }) }
                        </ul>
                    }
                    <ProgressBar value={item.progress_percentage} label="Progress" />
                </article>
            }) }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ScrollStackProps {
    items: Vec<DisplayItem>,
}

#[function_component(ScrollStack)]
fn scroll_stack(props: &ScrollStackProps) -> Html {
    let items = props.items.clone();
    let item_count = items.len();

    let container_ref = use_node_ref();
    let controller = use_mut_ref(|| StackController::new(0, SnapTimings::default()));
    let stage = use_state(|| CardStage::Steady { index: 0 });
    let is_mobile = use_state(|| media_query_matches(MOBILE_MEDIA_QUERY));
    let selected_item = use_state(|| Option::<DisplayItem>::None);
    let carousel = use_state(|| Option::<Vec<MediaAsset>>::None);

    let debounce_timer = use_mut_ref(|| Option::<Timeout>::None);
    let snap_timer = use_mut_ref(|| Option::<Timeout>::None);
    let exit_timer = use_mut_ref(|| Option::<Timeout>::None);
    let settle_timer = use_mut_ref(|| Option::<Timeout>::None);

    // Track the breakpoint; the narrow layout bypasses the controller.
    {
        let is_mobile = is_mobile.clone();
        use_effect_with(item_count, move |&count| {
            let mut attached = false;
            let on_resize = Closure::<dyn FnMut()>::new(move || {
                is_mobile.set(media_query_matches(MOBILE_MEDIA_QUERY));
            });

            if count > 0 {
                if let Some(win) = window() {
                    attached = win
                        .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
                        .is_ok();
                }
            }

            move || {
                if attached {
                    if let Some(win) = window() {
                        let _ = win.remove_event_listener_with_callback(
                            "resize",
                            on_resize.as_ref().unchecked_ref(),
                        );
                    }
                }
            }
        });
    }

    {
        let container_ref = container_ref.clone();
        let controller = controller.clone();
        let stage = stage.clone();
        let debounce_timer = debounce_timer.clone();
        let snap_timer = snap_timer.clone();
        let exit_timer = exit_timer.clone();
        let settle_timer = settle_timer.clone();

        use_effect_with((item_count, *is_mobile), move |&(count, mobile)| {
            *controller.borrow_mut() = StackController::new(count, SnapTimings::default());
            stage.set(CardStage::Steady { index: 0 });

            // With nothing to show there is nothing to instrument.
            if count == 0 || mobile {
                let noop: Box<dyn FnOnce()> = Box::new(|| ());
                return noop;
            }

            let update: Rc<dyn Fn()> = {
                let container_ref = container_ref.clone();
                let controller = controller.clone();
                let stage = stage.clone();
                let debounce_timer = debounce_timer.clone();
                let snap_timer = snap_timer.clone();
                let exit_timer = exit_timer.clone();
                let settle_timer = settle_timer.clone();

                Rc::new(move || {
                    let Some(container) = container_ref.cast::<HtmlElement>() else {
                        return;
                    };

                    let change = controller.borrow_mut().note_scroll(
                        page_scroll_y(),
                        container.offset_top() as f64,
                        viewport_height(),
                        now_ms(),
                    );

                    if let Some(change) = change {
                        stage.set(CardStage::Leaving {
                            from: change.from,
                            direction: change.direction,
                        });

                        let stage_enter = stage.clone();
                        let entering = change.to;
                        let direction = change.direction;
                        *exit_timer.borrow_mut() = Some(Timeout::new(CARD_EXIT_MS, move || {
                            stage_enter.set(CardStage::Entering {
                                index: entering,
                                direction,
                            });
                        }));

                        let stage_settle = stage.clone();
                        *settle_timer.borrow_mut() = Some(Timeout::new(CARD_SETTLE_MS, move || {
                            stage_settle.set(CardStage::Steady { index: entering });
                        }));
                    }

                    // Re-arming replaces the pending timer, so only the last
                    // quiet period fires the snap.
                    let controller_on_quiet = controller.clone();
                    let snap_timer_slot = snap_timer.clone();
                    *debounce_timer.borrow_mut() = Some(Timeout::new(SNAP_DEBOUNCE_MS, move || {
                        let target = controller_on_quiet.borrow_mut().tick(now_ms());
                        if let Some(target) = target {
                            smooth_scroll_to(target.scroll_to);

                            let controller_on_done = controller_on_quiet.clone();
                            *snap_timer_slot.borrow_mut() =
                                Some(Timeout::new(SNAP_DURATION_MS, move || {
                                    controller_on_done.borrow_mut().tick(now_ms());
                                }));
                        }
                    }));
                })
            };

            (*update)();

            let on_scroll = {
                let update = update.clone();
                Closure::<dyn FnMut()>::new(move || (*update)())
            };
            let on_wheel = {
                let controller = controller.clone();
                Closure::<dyn FnMut(WheelEvent)>::new(move |event: WheelEvent| {
                    if controller.borrow().wheel_decision(now_ms()) == WheelDecision::Suppress {
                        event.prevent_default();
                    }
                })
            };

            let container = container_ref.cast::<HtmlElement>();
            if let Some(win) = window() {
                let _ = win
                    .add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref());
                let _ = win
                    .add_event_listener_with_callback("resize", on_scroll.as_ref().unchecked_ref());
            }
            if let Some(container) = container.as_ref() {
                // passive: false so the guard may cancel the wheel.
                let wheel_options = AddEventListenerOptions::new();
                wheel_options.set_passive(false);
                let _ = container.add_event_listener_with_callback_and_add_event_listener_options(
                    "wheel",
                    on_wheel.as_ref().unchecked_ref(),
                    &wheel_options,
                );
            }

            let cleanup: Box<dyn FnOnce()> = Box::new(move || {
                if let Some(win) = window() {
                    let _ = win.remove_event_listener_with_callback(
                        "scroll",
                        on_scroll.as_ref().unchecked_ref(),
                    );
                    let _ = win.remove_event_listener_with_callback(
                        "resize",
                        on_scroll.as_ref().unchecked_ref(),
                    );
                }
                if let Some(container) = container.as_ref() {
                    let _ = container.remove_event_listener_with_callback(
                        "wheel",
                        on_wheel.as_ref().unchecked_ref(),
                    );
                }

                debounce_timer.borrow_mut().take();
                snap_timer.borrow_mut().take();
                exit_timer.borrow_mut().take();
                settle_timer.borrow_mut().take();
            });
            cleanup
        });
    }

    if item_count == 0 {
        return Html::default();
    }

    let on_open_modal = {
        let selected_item = selected_item.clone();
        Callback::from(move |item: DisplayItem| selected_item.set(Some(item)))
    };
    let on_close_modal = {
        let selected_item = selected_item.clone();
        Callback::from(move |_| selected_item.set(None))
    };
    let on_open_carousel = {
        let carousel = carousel.clone();
        Callback::from(move |assets: Vec<MediaAsset>| {
            if !assets.is_empty() {
                carousel.set(Some(assets));
            }
        })
    };
    let on_close_carousel = {
        let carousel = carousel.clone();
        Callback::from(move |_| carousel.set(None))
    };

    let overlays = html! {
        <>
            if let Some(item) = (*selected_item).clone() {
                <ItemDetailModal item={item} on_close={on_close_modal.clone()} />
            }
            if let Some(assets) = (*carousel).clone() {
                <MediaCarousel assets={assets} on_close={on_close_carousel.clone()} />
            }
        </>
    };

    if *is_mobile {
        return html! {
            <>
                <MobileStack items={items} />
                {overlays}
            </>
        };
    }

    let (visible_index, card_class) = match &*stage {
        CardStage::Steady { index } => (*index, classes!("stack-card")),
        CardStage::Leaving { from, direction } => (*from, classes!("stack-card", exit_class(*direction))),
        CardStage::Entering { index, direction } => (*index, classes!("stack-card", enter_class(*direction))),
    };
    let visible_index = visible_index.min(item_count - 1);
    let item = items[visible_index].clone();
    let variant = variant_for_index(visible_index);

    html! {
        <>
            <div
                ref={container_ref}
                class="stack-container"
                style={format!("height: {}vh;", item_count * 100)}
            >
                <div class="stack-sticky">
                    <div class={card_class} key={item.id.clone()}>
                        <CardView
                            item={item}
                            variant={variant}
                            on_open_modal={on_open_modal}
                            on_open_carousel={on_open_carousel}
                        />
                        <div class="stack-position">{format!("{} / {}", visible_index + 1, item_count)}</div>
                    </div>
                </div>
            </div>
            {overlays}
        </>
    }
}

#[derive(Properties, PartialEq)]
struct ContactSectionProps {
    on_toast: Callback<ToastMessage>,
}

#[function_component(ContactSection)]
fn contact_section(props: &ContactSectionProps) -> Html {
    let form = use_state(ContactSubmission::default);
    let errors = use_state(Vec::<(ContactField, &'static str)>::new);
    let submitting = use_state(|| false);

    let edit_input = |apply: fn(&mut ContactSubmission, String)| {
        let form = form.clone();
        Callback::from(move |event: InputEvent| {
            let value = event.target_unchecked_into::<HtmlInputElement>().value();
            let mut next = (*form).clone();
            apply(&mut next, value);
            form.set(next);
        })
    };
    let edit_message = {
        let form = form.clone();
        Callback::from(move |event: InputEvent| {
            let value = event.target_unchecked_into::<HtmlTextAreaElement>().value();
            let mut next = (*form).clone();
            next.message = value;
            form.set(next);
        })
    };

    let error_for = |field: ContactField| -> Option<&'static str> {
        errors
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, message)| *message)
    };

    let onsubmit = {
        let form = form.clone();
        let errors = errors.clone();
        let submitting = submitting.clone();
        let on_toast = props.on_toast.clone();

        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();

            if *submitting {
                return;
            }

            let submission = (*form).clone();
            let found = contact::validate(&submission);
            if !found.is_empty() {
                errors.set(found);
                on_toast.emit(ToastMessage {
                    ok: false,
                    text: "Please fill in all required fields correctly".to_string(),
                });
                return;
            }

            errors.set(Vec::new());
            submitting.set(true);

            let form_reset = form.clone();
            let submitting_done = submitting.clone();
            let on_toast = on_toast.clone();
            spawn_local(async move {
                match contact::submit(&submission).await {
                    Ok(text) => {
                        form_reset.set(ContactSubmission::default());
                        on_toast.emit(ToastMessage { ok: true, text });
                    }
                    Err(text) => on_toast.emit(ToastMessage { ok: false, text }),
                }
                submitting_done.set(false);
            });
        })
    };

    html! {
        <form class="contact-form" onsubmit={onsubmit}>
            <div class="field-row">
                <label class="field">
                    <span>{"First name"}</span>
                    <input
                        name="first_name"
                        value={form.first_name.clone()}
                        oninput={edit_input(|form, value| form.first_name = value)}
                    />
                    if let Some(message) = error_for(ContactField::FirstName) {
                        <span class="field-error">{message}</span>
                    }
                </label>
                <label class="field">
                    <span>{"Last name"}</span>
                    <input
                        name="last_name"
                        value={form.last_name.clone()}
                        oninput={edit_input(|form, value| form.last_name = value)}
                    />
                </label>
            </div>
            <div class="field-row">
                <label class="field">
                    <span>{"Email"}</span>
                    <input
                        name="email"
                        type="email"
                        value={form.email.clone()}
                        oninput={edit_input(|form, value| form.email = value)}
                    />
                    if let Some(message) = error_for(ContactField::Email) {
                        <span class="field-error">{message}</span>
                    }
                </label>
                <label class="field">
                    <span>{"Phone"}</span>
                    <input
                        name="phone_number"
                        value={form.phone_number.clone()}
                        oninput={edit_input(|form, value| form.phone_number = value)}
                    />
                </label>
            </div>
            <label class="field">
                <span>{"Subject"}</span>
                <input
                    name="subject"
                    value={form.subject.clone()}
                    oninput={edit_input(|form, value| form.subject = value)}
                />
            </label>
            <label class="field">
                <span>{"Message"}</span>
                <textarea
                    name="message"
                    rows="5"
                    value={form.message.clone()}
                    oninput={edit_message}
                />
                if let Some(message) = error_for(ContactField::Message) {
                    <span class="field-error">{message}</span>
                }
            </label>
            <button type="submit" class="submit-button" disabled={*submitting}>
                { if *submitting { "Sending..." } else { "Send Message" } }
            </button>
        </form>
    }
}

#[function_component(App)]
fn app() -> Html {
    let theme = use_state(resolve_theme);
    let projects = use_state(|| FetchState::<Vec<DisplayItem>>::Loading);
    let tech_stacks = use_state(|| FetchState::<Vec<TechStackRecord>>::Loading);
    let experiences = use_state(|| FetchState::<Vec<ExperienceRecord>>::Loading);
    let toast = use_state(|| Option::<ToastMessage>::None);
    let toast_timer = use_mut_ref(|| Option::<Timeout>::None);

    {
        let current = *theme;
        use_effect_with((), move |_| {
            apply_theme(current);
            || ()
        });
    }

    {
        let projects = projects.clone();
        let tech_stacks = tech_stacks.clone();
        let experiences = experiences.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let client = ContentClient::new();
                let response = client
                    .projects(PageRequest::default(), &Sorting::default(), None)
                    .await;
                projects.set(match (response.success, response.data) {
                    (true, Some(records)) => {
                        FetchState::Loaded(records.into_iter().map(DisplayItem::from).collect())
                    }
                    _ => FetchState::Failed(
                        response
                            .message
                            .unwrap_or_else(|| "Could not load projects".to_string()),
                    ),
                });
            });
            spawn_local(async move {
                let client = ContentClient::new();
                let response = client
                    .tech_stacks(PageRequest { page: 1, per_page: 50 }, &Sorting::default())
                    .await;
                tech_stacks.set(match (response.success, response.data) {
                    (true, Some(records)) => FetchState::Loaded(records),
                    _ => FetchState::Failed(
                        response
                            .message
                            .unwrap_or_else(|| "Could not load the tech stack".to_string()),
                    ),
                });
            });
            spawn_local(async move {
                let client = ContentClient::new();
                let response = client
                    .experiences(PageRequest::default(), &Sorting {
                        sort_by: "start_date".to_string(),
                        sort_order: crate::api::SortOrder::Desc,
                    })
                    .await;
                experiences.set(match (response.success, response.data) {
                    (true, Some(records)) => FetchState::Loaded(records),
                    _ => FetchState::Failed(
                        response
                            .message
                            .unwrap_or_else(|| "Could not load experiences".to_string()),
                    ),
                });
            });
            || ()
        });
    }

    let on_toggle_theme = {
        let theme = theme.clone();
        Callback::from(move |_: MouseEvent| {
            let next = (*theme).toggled();
            persist_theme(next);
            apply_theme(next);
            theme.set(next);
        })
    };

    let show_toast = {
        let toast = toast.clone();
        let toast_timer = toast_timer.clone();
        Callback::from(move |message: ToastMessage| {
            toast.set(Some(message));

            let toast_reset = toast.clone();
            *toast_timer.borrow_mut() = Some(Timeout::new(TOAST_DISMISS_MS, move || {
                toast_reset.set(None);
            }));
        })
    };

    html! {
        <>
            <a class="skip-link" href="#content">{"Skip to main content"}</a>
            <div class="page-shell">
                <header class="site-header">
                    <span class="site-mark">{"stackfolio"}</span>
                    <nav aria-label="Sections">
                        <a href="#about">{"About"}</a>
                        <a href="#projects">{"Projects"}</a>
                        <a href="#experience">{"Experience"}</a>
                        <a href="#tech">{"Tech Stack"}</a>
                        <a href="#contact">{"Contact"}</a>
                    </nav>
                    <button
                        class="theme-toggle"
                        type="button"
                        aria-label={format!("Switch to {} theme", (*theme).toggled().as_str())}
                        aria-pressed={matches!(*theme, Theme::Dark).to_string()}
                        onclick={on_toggle_theme}
                    >
                        <span aria-hidden="true">{(*theme).icon()}</span>
                    </button>
                </header>

                <main id="content">
                    <section id="about" aria-labelledby="about-heading" class="section-block hero">
                        <h1 id="about-heading">{"Software, shipped and shown."}</h1>
                        <p>
                            {"A walk through the projects I build, the stack behind them, and the places they run. "}
                            {"Scroll through the project stack below one card at a time."}
                        </p>
                    </section>

                    <section id="projects" aria-labelledby="projects-heading" class="section-block">
                        <h2 id="projects-heading">{"Projects"}</h2>
                        {
                            match &*projects {
                                FetchState::Loading => html! { <p class="section-note">{"Loading projects..."}</p> },
                                FetchState::Failed(message) => html! { <p class="section-note section-error">{message.clone()}</p> },
                                FetchState::Loaded(items) => html! { <ScrollStack items={items.clone()} /> },
                            }
                        }
                    </section>

                    <section id="experience" aria-labelledby="experience-heading" class="section-block">
                        <h2 id="experience-heading">{"Experience"}</h2>
                        {
                            match &*experiences {
                                FetchState::Loading => html! { <p class="section-note">{"Loading experience..."}</p> },
                                FetchState::Failed(message) => html! { <p class="section-note section-error">{message.clone()}</p> },
                                FetchState::Loaded(records) => html! {
                                    <ol class="experience-list">
                                        { for records.iter().map(|record| html! {
                                            <li key={record.id.clone()} class="experience-entry">
                                                <div class="experience-heading">
                                                    <h3>{format!("{} · {}", record.role, record.company)}</h3>
                                                    <span class="experience-dates">
                                                        {format!(
                                                            "{} — {}",
                                                            record.start_date,
                                                            record.end_date.clone().unwrap_or_else(|| "Present".to_string()),
                                                        )}
                                                    </span>
                                                </div>
                                                <p class="experience-meta">
                                                    { record.location.clone().unwrap_or_default() }
                                                    if let Some(arrangement) = record.arrangement.clone() {
                                                        {format!(" · {arrangement}")}
                                                    }
                                                </p>
                                                <p>{record.work_description.clone()}</p>
                                                if !record.impact.is_empty() {
                                                    <ul class="impact-list">
                                                        { for record.impact.iter().map(|line| html! {
                                                            <li key={line.clone()}>{line.clone()}</li>
                                                        }) }
                                                    </ul>
                                                }
                                                if !record.experience_tech_stack.is_empty() {
                                                    <TechStrip entries={
                                                        record.experience_tech_stack
                                                            .iter()
                                                            .map(|link| TechEntry::from(link.tech_stack.clone()))
                                                            .collect::<Vec<_>>()
                                                    } />
                                                }
                                            </li>
                                        }) }
                                    </ol>
                                },
                            }
                        }
                    </section>

                    <section id="tech" aria-labelledby="tech-heading" class="section-block">
                        <h2 id="tech-heading">{"Tech Stack"}</h2>
                        {
                            match &*tech_stacks {
                                FetchState::Loading => html! { <p class="section-note">{"Loading the stack..."}</p> },
                                FetchState::Failed(message) => html! { <p class="section-note section-error">{message.clone()}</p> },
                                FetchState::Loaded(records) => html! {
                                    <ul class="tech-grid">
                                        { for records.iter().map(|record| html! {
                                            <li key={record.name.clone()} class={classes!("tech-cell", record.is_core_skill.then_some("tech-core"))}>
                                                if let Some(image_url) = record.image_url.clone() {
                                                    <img src={image_url} alt={record.name.clone()} loading="lazy" />
                                                }
                                                <span>{record.name.clone()}</span>
                                                if let Some(category) = record.category.clone() {
                                                    <span class="tech-category">{category}</span>
                                                }
                                            </li>
                                        }) }
                                    </ul>
                                },
                            }
                        }
                    </section>

                    <section id="contact" aria-labelledby="contact-heading" class="section-block">
                        <h2 id="contact-heading">{"Contact"}</h2>
                        <ContactSection on_toast={show_toast} />
                    </section>
                </main>

                <footer class="site-footer">
                    <p>{"Fetched live, rendered one card at a time."}</p>
                </footer>
            </div>

            if let Some(message) = (*toast).clone() {
                <div class={classes!("toast", if message.ok { "toast-ok" } else { "toast-error" })} role="status">
                    {message.text}
                </div>
            }
        </>
    }
}

pub fn run() {
    yew::Renderer::<App>::with_root(
        window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .expect("missing #app mount point"),
    )
    .render();
}
