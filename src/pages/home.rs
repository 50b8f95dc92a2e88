use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;

use crate::api;
use crate::components::knowledge_graph::{GraphPayload, KnowledgeGraphCanvas};
use crate::components::search_bar::SearchBar;

/// Default Home Page: a search box over the knowledge-graph view.
#[component]
pub fn Home() -> impl IntoView {
	let (payload, set_payload) = signal(Option::<GraphPayload>::None);
	let (is_loading, set_is_loading) = signal(false);
	let (error, set_error) = signal(Option::<String>::None);

	let on_search = Callback::new(move |query: String| {
		if let Err(e) = api::validate_query(&query) {
			set_error.set(Some(e.to_string()));
			return;
		}
		spawn_local(async move {
			set_is_loading.set(true);
			set_error.set(None);
			match api::fetch_related_words(&query).await {
				Ok(data) => set_payload.set(Some(data)),
				Err(e) => {
					warn!("search failed: {e}");
					// A failed query keeps the previous graph on screen.
					set_error.set(Some(e.to_string()));
				}
			}
			set_is_loading.set(false);
		});
	});

	view! {
		<div class="app">
			<header class="app-header">
				<h1>"Knowledge Graph Explorer"</h1>
				<p>"Enter a query to see related terms:"</p>
				<SearchBar on_search=on_search />
				{move || is_loading.get().then(|| view! { <p class="loading">"Loading..."</p> })}
				{move || error.get().map(|e| view! { <p class="error">{e}</p> })}
			</header>
			{move || {
				payload.get().map(|data| {
					let data = Signal::derive(move || data.clone());
					view! {
						<div class="graph-container">
							<KnowledgeGraphCanvas data=data />
						</div>
					}
				})
			}}
		</div>
	}
}
