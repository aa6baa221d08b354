//! Waiting indicator

use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SpinnerProps {
    /// Caption under the indicator
    #[prop_or_default]
    pub label: Option<AttrValue>,
    /// Center in the viewport instead of inline
    #[prop_or_default]
    pub full_screen: bool,
}

#[function_component(Spinner)]
pub fn spinner(props: &SpinnerProps) -> Html {
    let layout = if props.full_screen {
        classes!("min-h-screen", "justify-center")
    } else {
        classes!("py-10")
    };
    let label = props
        .label
        .clone()
        .unwrap_or_else(|| AttrValue::from("Loading..."));

    html! {
        <div class={classes!("flex", "flex-col", "items-center", layout)} role="status" aria-live="polite">
            <svg class="h-10 w-10 animate-spin text-teal-600" viewBox="0 0 24 24" fill="none" aria-hidden="true">
                <circle class="opacity-25" cx="12" cy="12" r="10" stroke="currentColor" stroke-width="4" />
                <path class="opacity-75" fill="currentColor" d="M4 12a8 8 0 018-8v4a4 4 0 00-4 4H4z" />
            </svg>
            <span class="mt-4 text-sm text-gray-600">{label}</span>
        </div>
    }
}
