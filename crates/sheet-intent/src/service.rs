//! Add-on operations wired to the spreadsheet host and the remote services.

use std::sync::Arc;

use serde_json::Value;
use sheet_intent_core::validation::{check_header_validity, check_range_validity};
use sheet_intent_core::{
    AddOnConfig, ConfirmResponse, DateColumnProfile, Grid, QueryForm, QueryResult,
    QuerySettings, Rectangle, Result, SelectedRange, SelectionError, TableSelection,
};
use sheet_intent_gateway::{DateDetectionClient, HttpTransport, QueryGateway};
use sheet_intent_session::{AddOnSession, PropertyStore, SpreadsheetHost};
use tracing::{debug, info, instrument};

use crate::params::{ConfirmSelectionParams, LaunchResponse};

/// The add-on's server-side entry points.
///
/// One request is handled at a time; the session's property store carries
/// state between them.
pub struct IntentService<H, S, T> {
    session: AddOnSession<H, S>,
    gateway: QueryGateway<Arc<T>>,
    dates: DateDetectionClient<Arc<T>>,
    defaults: QuerySettings,
}

impl<H: SpreadsheetHost, S: PropertyStore, T: HttpTransport> IntentService<H, S, T> {
    /// Create a service; both remote services share `transport`.
    pub fn new(host: H, store: S, transport: Arc<T>, config: &AddOnConfig) -> Self {
        Self {
            session: AddOnSession::with_settings(host, store, config.selection.clone()),
            gateway: QueryGateway::new(Arc::clone(&transport), config.endpoints.query_url.clone()),
            dates: DateDetectionClient::new(transport, config.endpoints.date_detection_url.clone()),
            defaults: config.query.clone(),
        }
    }

    /// The underlying session.
    pub fn session(&self) -> &AddOnSession<H, S> {
        &self.session
    }

    /// The underlying session, mutably.
    pub fn session_mut(&mut self) -> &mut AddOnSession<H, S> {
        &mut self.session
    }

    /// Reset state and preselect the table around the user's selection.
    #[instrument(skip_all)]
    pub fn launch(&mut self) -> Result<LaunchResponse> {
        let selection = self.session.launch()?;
        Ok(self.launch_response(selection))
    }

    /// Re-detect the table around the stored range.
    #[instrument(skip_all)]
    pub fn reload(&mut self) -> Result<LaunchResponse> {
        let selection = self.session.reload_entire_table()?;
        Ok(self.launch_response(selection))
    }

    fn launch_response(&self, selection: Option<TableSelection>) -> LaunchResponse {
        LaunchResponse {
            session_id: self.session.id().to_string(),
            selection,
        }
    }

    /// Header proposal for the user's current selection.
    pub fn reconcile_selection(&self) -> Result<SelectedRange> {
        self.session.reconcile_with_previous()
    }

    /// Header proposal covering the whole stored table.
    pub fn select_entire_table(&self) -> Result<SelectedRange> {
        let selection = self.session.require_selection()?;
        self.session
            .select_entire_table(selection.entire_table_range)
    }

    /// Validate and apply the form's range and header row.
    ///
    /// Rejections are reported in the response; only host and store failures
    /// are errors.
    #[instrument(skip_all)]
    pub fn confirm_selection(&mut self, params: &ConfirmSelectionParams) -> Result<ConfirmResponse> {
        let outcome = self.apply_selection(params);
        ConfirmResponse::from_outcome(outcome)
    }

    fn apply_selection(&mut self, params: &ConfirmSelectionParams) -> Result<TableSelection> {
        let range_text = params.range_a1_notation.trim();
        if !check_range_validity(range_text) {
            return Err(SelectionError::MalformedRange.into());
        }
        if !check_header_validity(&params.header_row) {
            return Err(SelectionError::MalformedHeaderRow.into());
        }
        let header_row: u32 = params
            .header_row
            .trim()
            .parse()
            .map_err(|_| SelectionError::MalformedHeaderRow)?;

        let host = self.session.host();
        let bounds = host.data_range(host.active_sheet())?;
        let range = Rectangle::parse_open_a1(range_text, bounds.row_end, bounds.col_end)
            .map_err(|_| SelectionError::MalformedRange)?;
        let header_range = match params.header_range.as_deref() {
            Some(a1) => Rectangle::parse_a1(a1).map_err(|_| SelectionError::MalformedHeaderRow)?,
            None => range.row_band(header_row)?,
        };
        debug!(range = %range, header_row, header_range = %header_range, "Confirming selection");

        self.session
            .confirm_selection(range, header_row, header_range)
    }

    /// Column names of the confirmed table.
    pub fn headers(&self) -> Result<Vec<String>> {
        self.session.headers()
    }

    /// Values under the user's current selection, for filter pickers.
    pub fn filter_values(&self) -> Result<Grid> {
        self.session.filter_values()
    }

    /// Ask the date service about the selected table and cache the answer.
    ///
    /// Service failures leave an empty profile in the cache.
    #[instrument(skip_all)]
    pub async fn detect_dates(&mut self) -> Result<DateColumnProfile> {
        let table = self.session.date_detection_table()?;
        let profile = self.dates.detect(&table).await;
        self.session.store_date_columns(&profile)?;
        Ok(profile)
    }

    /// Parse a sidebar form, filling ranking fields it leaves out from the
    /// configured defaults.
    pub fn form_from_json(&self, json: &str) -> Result<QueryForm> {
        let mut value: Value = serde_json::from_str(json)?;
        if let Value::Object(fields) = &mut value {
            fields
                .entry("isAsc")
                .or_insert(Value::Bool(self.defaults.default_is_asc));
            fields
                .entry("topKLimit")
                .or_insert(Value::from(self.defaults.default_top_k_limit));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Wire JSON the form would be sent as, without sending it.
    pub fn describe(&self, form: &QueryForm) -> Result<String> {
        self.session.build_descriptor(form)?.to_json()
    }

    /// Evaluate a form against the selected table.
    ///
    /// Form and selection problems are errors; anything that goes wrong after
    /// the query is built comes back as a failed [`QueryResult`].
    #[instrument(skip_all, fields(intent = form.intent.as_str()))]
    pub async fn eval_query(&self, form: &QueryForm) -> Result<QueryResult> {
        let descriptor = self.session.build_descriptor(form).map_err(|e| {
            info!(error = %e, "Query form rejected");
            e
        })?;
        Ok(self.gateway.send(&descriptor).await)
    }
}
