//! Financial statement endpoints.
//!
//! The account balance sheet is a POST signed with the session customer.
//! Every other statement is a GET whose customer, accounting period and
//! (for balance-sheet style statements) reclassification flag are signed and
//! echoed as headers.

use crate::client::{ApiClient, QueryParams};
use crate::credential::SigningContext;
use crate::FinanceError;
use serde::{Deserialize, Serialize};

const BASE: &str = "/finance/sheetController";

fn is_zero(value: &i64) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Trial balance query. Zero, empty and false optional fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalanceSheetRequest {
    /// Customer identifier.
    pub customer_id: String,
    /// First period, e.g. `202401`.
    pub begin_period: String,
    /// Last period, inclusive.
    pub end_period: String,
    /// Page number, starting at 1.
    pub page_no: i64,
    /// Rows per page.
    pub page_size: i64,
    /// First account title code.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub begin_title_code: String,
    /// Last account title code.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub end_title_code: String,
    /// Account title depth, 1 to 6.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub title_level: i64,
    /// Include account titles.
    #[serde(default, skip_serializing_if = "is_false")]
    pub show_title: bool,
    /// Include auxiliary accounting.
    #[serde(default, skip_serializing_if = "is_false")]
    pub show_assistant: bool,
    /// Include year-to-date totals.
    #[serde(default, skip_serializing_if = "is_false")]
    pub show_year_accumulated: bool,
    /// Include quantities.
    #[serde(default, skip_serializing_if = "is_false")]
    pub show_quantity: bool,
    /// Foreign currency code, for titles kept in a foreign currency.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fcur_code: String,
    /// `c` customer, `s` supplier, `i` inventory, `p` project, `d` department, `e` employee.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub assistant_type: String,
    /// Inventory category.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub inventory_type: String,
    /// Auxiliary accounting item.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub assistant_id: i64,
    /// Include titles with a zero closing balance.
    #[serde(rename = "showEndBalance0", default, skip_serializing_if = "is_false")]
    pub show_end_balance_zero: bool,
    /// Only first-level titles.
    #[serde(default, skip_serializing_if = "is_false")]
    pub first_account_title: bool,
}

/// Trial balance rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountBalanceSheet {
    /// One row per account title.
    pub list: Vec<AccountBalanceRow>,
}

/// One account title in the trial balance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountBalanceRow {
    /// Account title identifier.
    pub title_id: i64,
    /// Whether the title is a leaf.
    pub title_is_last: bool,
    /// Auxiliary accounting type.
    pub assistant_type: String,
    /// Auxiliary accounting item.
    pub assistant_id: i64,
    /// Account title code.
    pub title_code: String,
    /// Account title name.
    pub title_name: String,
    /// Full account title path.
    pub title_full_name: String,
    /// Parent account title code.
    #[serde(rename = "PTitleCode")]
    pub parent_title_code: String,
    /// Depth in the hierarchy.
    pub level: i64,
    /// Account title category.
    #[serde(rename = "type")]
    pub title_type: String,
    /// Quantity unit.
    pub unit: String,
    /// Foreign currency code.
    pub fcur_code: String,
    /// Item specification.
    pub specification: String,
    /// Auxiliary item name.
    pub assistant_name: String,
    /// Opening balance direction.
    pub begin_direction: i64,
    /// Opening balance.
    pub begin_amount: f64,
    /// Opening quantity.
    pub begin_quantity: f64,
    /// Opening unit price.
    pub begin_unit_price: f64,
    /// Opening debit.
    pub begin_debit: f64,
    /// Opening credit.
    pub begin_credit: f64,
    /// Opening debit in foreign currency.
    pub begin_debit_fcur: f64,
    /// Opening credit in foreign currency.
    pub begin_credit_fcur: f64,
    /// Period debit.
    pub occurred_debit: f64,
    /// Period debit quantity.
    pub occurred_debit_quantity: f64,
    /// Period debit in foreign currency.
    pub occurred_debit_fcur: f64,
    /// Period credit.
    pub occurred_credit: f64,
    /// Period credit quantity.
    pub occurred_credit_quantity: f64,
    /// Period credit in foreign currency.
    pub occurred_credit_fcur: f64,
    /// Year-to-date debit.
    pub year_accumulated_debit: f64,
    /// Year-to-date credit.
    pub year_accumulated_credit: f64,
    /// Closing debit.
    pub end_debit: f64,
    /// Closing credit.
    pub end_credit: f64,
    /// Closing debit in foreign currency.
    pub end_debit_fcur: f64,
    /// Closing credit in foreign currency.
    pub end_credit_fcur: f64,
    /// Closing balance direction.
    pub end_direction: i64,
    /// Closing balance.
    pub end_amount: f64,
    /// Closing quantity.
    pub end_quantity: f64,
    /// Closing unit price.
    pub end_unit_price: f64,
    /// Period debit unit price.
    pub occurred_debit_unit_price: f64,
    /// Period credit unit price.
    pub occurred_credit_unit_price: f64,
}

/// Customer and accounting period, e.g. `202401`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodRequest {
    /// Customer identifier.
    pub customer_id: String,
    /// Accounting period, e.g. `202401`.
    pub account_period: String,
}

impl PeriodRequest {
    /// Request for one customer and period.
    pub fn new(customer_id: impl Into<String>, account_period: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            account_period: account_period.into(),
        }
    }

    fn context(&self) -> SigningContext {
        SigningContext::empty()
            .account_period(self.account_period.as_str())
            .customer(self.customer_id.as_str())
    }

    fn query(&self) -> QueryParams {
        QueryParams::new()
            .required("accountPeriod", self.account_period.as_str())
            .required("customerId", self.customer_id.as_str())
    }
}

/// Balance-sheet style request with an optional reclassification flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionRequest {
    /// Customer identifier.
    pub customer_id: String,
    /// Accounting period, e.g. `202401`.
    pub account_period: String,
    /// Reclassification flag; not sent when empty.
    pub reclassify_flag: Option<String>,
}

impl PositionRequest {
    /// Request without reclassification.
    pub fn new(customer_id: impl Into<String>, account_period: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            account_period: account_period.into(),
            reclassify_flag: None,
        }
    }

    /// Set the reclassification flag.
    pub fn reclassify(mut self, flag: impl Into<String>) -> Self {
        self.reclassify_flag = Some(flag.into());
        self
    }

    fn context(&self) -> SigningContext {
        SigningContext {
            reclassify_flag: self.reclassify_flag.clone().filter(|f| !f.is_empty()),
            ..PeriodRequest::new(self.customer_id.as_str(), self.account_period.as_str()).context()
        }
    }

    fn query(&self) -> QueryParams {
        QueryParams::new()
            .required("accountPeriod", self.account_period.as_str())
            .required("customerId", self.customer_id.as_str())
            .optional("reclassifyFlag", self.reclassify_flag.as_deref())
    }
}

/// One line of a balance sheet or income statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SheetRow {
    /// Line label.
    pub account_title_name: String,
    /// Line number shown on the statement.
    pub row: i64,
    /// Line identifier.
    pub number: i64,
    /// Depth in the hierarchy.
    pub level: i64,
    /// Parent `number`, for rebuilding the hierarchy.
    #[serde(rename = "PRowNum")]
    pub parent_row_num: i64,
    /// Set when the line holds anomalous data.
    pub warn: bool,
    /// Display line number.
    pub show_line: i64,
    /// Closing balance.
    pub balance_end: f64,
    /// Balance at the start of the year.
    pub year_begin_balance: f64,
    /// Formula used for the line.
    pub fomular_detail: String,
    /// Formula for the restricted part.
    pub limit_fomular_detail: String,
    /// Formula for the unrestricted part.
    pub non_limit_fomular_detail: String,
    /// Restricted amount for the period.
    pub limit_occurre_amount: f64,
    /// Unrestricted amount for the period.
    pub non_limit_occurre_amout: f64,
    /// Restricted year-to-date amount.
    pub limit_year_accumulated: f64,
    /// Unrestricted year-to-date amount.
    pub non_limit_year_accumulated: f64,
    /// Year-to-date amount.
    pub year_accumulated: f64,
    /// First quarter amount.
    pub quarter_one: f64,
    /// Second quarter amount.
    pub quarter_two: f64,
    /// Third quarter amount.
    pub quarter_three: f64,
    /// Fourth quarter amount.
    pub quarter_four: f64,
    /// Amount for the period.
    pub occurred_amount: f64,
    /// Prior year-to-date amount.
    pub pre_year_accumulated: f64,
    /// Amount for this period.
    pub amount_of_local_period: f64,
    /// Amount for the prior period.
    pub amount_of_pre_period: f64,
}

/// One line of a cash flow statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CashFlowRow {
    /// Short name.
    pub name: String,
    /// Line number.
    pub line: i64,
    /// Row identifier.
    pub row_num: i64,
    /// Parent line number.
    #[serde(rename = "PRowNum")]
    pub parent_row_num: i64,
    /// Year-to-date amount.
    pub year_accumulated_amount: f64,
    /// Amount for the month.
    pub current_month_amount: f64,
    /// Amount for the period.
    pub current_period_amount: f64,
    /// Amount for the prior period.
    pub prev_period_amount: f64,
    /// Amount for the prior year.
    pub prev_year_amount: f64,
}

/// Statement endpoints.
pub struct Statements<'a> {
    client: &'a ApiClient,
}

impl<'a> Statements<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    fn path(name: &str) -> String {
        format!("{}/{}", BASE, name)
    }

    /// Trial balance.
    pub fn query_account_balance_sheet(
        &self,
        request: &AccountBalanceSheetRequest,
    ) -> Result<AccountBalanceSheet, FinanceError> {
        self.client.post_json(
            &Self::path("queryAccountBalanceSheet"),
            self.client.session_context(),
            request,
        )
    }

    /// Monthly balance sheet.
    pub fn select_assets_debt_sheet(
        &self,
        request: &PositionRequest,
    ) -> Result<Vec<SheetRow>, FinanceError> {
        self.client.get_query(
            &Self::path("selectAssetsDebtSheet"),
            request.context(),
            &request.query(),
        )
    }

    /// Monthly income statement.
    pub fn select_income_sheet(
        &self,
        request: &PeriodRequest,
    ) -> Result<Vec<SheetRow>, FinanceError> {
        self.client.get_query(
            &Self::path("selectIncomeSheet"),
            request.context(),
            &request.query(),
        )
    }

    /// Monthly cash flow statement.
    pub fn get_month_cash_flows_statement(
        &self,
        request: &PeriodRequest,
    ) -> Result<Vec<CashFlowRow>, FinanceError> {
        self.client.get_query(
            &Self::path("getMonthCashFlowsStatement"),
            request.context(),
            &request.query(),
        )
    }

    /// Quarterly income statement.
    pub fn select_quarter_income_sheet(
        &self,
        request: &PeriodRequest,
    ) -> Result<Vec<SheetRow>, FinanceError> {
        self.client.get_query(
            &Self::path("selectQuarterIncomeSheet"),
            request.context(),
            &request.query(),
        )
    }

    /// Balance sheet for every month of the year.
    pub fn get_all_year_financial_position_statement(
        &self,
        request: &PositionRequest,
    ) -> Result<Vec<SheetRow>, FinanceError> {
        self.client.get_query(
            &Self::path("getAllYearMonthFinancialPositionStatement"),
            request.context(),
            &request.query(),
        )
    }

    /// Income statement for every month of the year.
    pub fn get_all_year_income_statement(
        &self,
        request: &PeriodRequest,
    ) -> Result<Vec<SheetRow>, FinanceError> {
        self.client.get_query(
            &Self::path("getAllYearMonthIncomeStatement"),
            request.context(),
            &request.query(),
        )
    }

    /// Cash flow statement for every month of the year.
    pub fn get_all_year_cash_flows_statement(
        &self,
        request: &PeriodRequest,
    ) -> Result<Vec<CashFlowRow>, FinanceError> {
        self.client.get_query(
            &Self::path("getAllYearMonthCashFlowsStatement"),
            request.context(),
            &request.query(),
        )
    }
}
