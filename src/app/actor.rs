//! App actor - message loop processing UI events and network responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::config::Config;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        config: &Config,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(config),
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        if let Some(cmd) = self.state.begin_load() {
            let _ = self.network_tx.send(cmd);
        }
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    tracing::debug!(id = response.id(), error = response.is_error(), "Network response");
                    self.state.handle_response(response);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Search
            UiEvent::StartSearch => self.state.start_search(),
            UiEvent::StopSearch => self.state.stop_search(),
            UiEvent::SearchChar(c) => self.state.search_char(c),
            UiEvent::SearchBackspace => self.state.search_backspace(),

            // View state
            UiEvent::ToggleSort(key) => self.state.toggle_sort(key),
            UiEvent::CyclePageSize => self.state.cycle_page_size(),
            UiEvent::NextPage => self.state.next_page(),
            UiEvent::PrevPage => self.state.prev_page(),
            UiEvent::GoToPage(page) => self.state.go_to_page(page),

            // Rows
            UiEvent::SelectNext => self.state.select_next(),
            UiEvent::SelectPrev => self.state.select_prev(),
            UiEvent::OpenDetail => self.state.open_detail(),

            // Forms
            UiEvent::OpenCreate => self.state.open_create(),
            UiEvent::CloseForm => self.state.close_form(),
            UiEvent::SubmitForm => {
                if let Some(cmd) = self.state.submit_form() {
                    let _ = self.network_tx.send(cmd);
                }
            }
            UiEvent::NextField => self.state.next_field(),
            UiEvent::PrevField => self.state.prev_field(),
            UiEvent::FormChar(c) => self.state.form_char(c),
            UiEvent::FormBackspace => self.state.form_backspace(),
            UiEvent::FormCursorLeft => self.state.form_cursor_left(),
            UiEvent::FormCursorRight => self.state.form_cursor_right(),
            UiEvent::CycleCategory { forward } => self.state.cycle_category(forward),

            // Workflows
            UiEvent::ExportCsv => self.state.export_csv(),
            UiEvent::Reload => {
                if let Some(cmd) = self.state.reload() {
                    let _ = self.network_tx.send(cmd);
                }
            }

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),
            UiEvent::DismissNotice => self.state.dismiss_notice(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;

    #[tokio::test]
    async fn test_actor_loads_then_renders_and_forwards_writes() {
        let (net_tx, mut net_cmd_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();

        let actor = AppActor::new(&Config::default(), net_tx, render_tx);
        let handle = tokio::spawn(actor.run(ui_rx, resp_rx));

        let Some(NetworkCommand::LoadCatalog { id }) = net_cmd_rx.recv().await else {
            panic!("expected initial load");
        };
        let first = render_rx.recv().await.unwrap();
        assert!(first.is_loading);

        resp_tx
            .send(NetworkResponse::CatalogLoaded {
                id,
                products: vec![Product { id: 1, title: String::from("Bag"), ..Product::default() }],
                categories: Vec::new(),
            })
            .unwrap();
        let loaded = render_rx.recv().await.unwrap();
        assert_eq!(loaded.rows.len(), 1);
        assert!(loaded.catalog_loaded);

        ui_tx.send(UiEvent::OpenDetail).unwrap();
        ui_tx.send(UiEvent::SubmitForm).unwrap();
        let cmd = net_cmd_rx.recv().await.unwrap();
        assert!(matches!(cmd, NetworkCommand::UpdateProduct { product_id: 1, .. }));

        ui_tx.send(UiEvent::Quit).unwrap();
        assert!(matches!(net_cmd_rx.recv().await, Some(NetworkCommand::Shutdown)));
        handle.await.unwrap();
    }
}
