use leptos::ev;
use leptos::prelude::*;

/// Free-text query input. Submitting emits the raw text through `on_search`;
/// blank-input handling lives with the query client, not here.
#[component]
pub fn SearchBar(#[prop(into)] on_search: Callback<String>) -> impl IntoView {
	let (query, set_query) = signal(String::new());

	let handle_submit = move |ev: ev::SubmitEvent| {
		ev.prevent_default();
		on_search.run(query.get());
	};

	view! {
		<form class="search-bar" on:submit=handle_submit>
			<input
				type="text"
				placeholder="Search for a term"
				prop:value=move || query.get()
				on:input=move |ev| set_query.set(event_target_value(&ev))
			/>
			<button type="submit">"Search"</button>
		</form>
	}
}
