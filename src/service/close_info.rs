//! Period close status.

use crate::client::ApiClient;
use crate::FinanceError;
use serde::{Deserialize, Serialize};

const GET_CLOSE_INFO: &str = "/alice/closeInfo/getCloseInfo";

/// Close-status lookup for up to 500 customers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCloseInfoRequest {
    /// Customer identifiers.
    pub customer_ids: Vec<String>,
}

/// Close status for the requested customers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloseInfoList {
    /// Close status per customer.
    pub customer_list: Vec<CloseInfo>,
}

/// Latest closed period of one customer's account set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloseInfo {
    /// Company identifier.
    pub company_id: String,
    /// Customer identifier.
    pub customer_id: String,
    /// Account set identifier.
    pub account_set_id: String,
    /// Latest closed period.
    pub max_close_period: String,
    /// First period of the account set.
    pub create_period: String,
}

/// Close-info endpoints.
pub struct CloseInfoService<'a> {
    client: &'a ApiClient,
}

impl<'a> CloseInfoService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Fetch close status. Signed with the session customer, if configured.
    pub fn get_close_info(
        &self,
        request: &GetCloseInfoRequest,
    ) -> Result<CloseInfoList, FinanceError> {
        self.client
            .post_json(GET_CLOSE_INFO, self.client.session_context(), request)
    }
}
