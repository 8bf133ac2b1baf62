//! Tax declaration endpoints.

use crate::client::{ApiClient, QueryParams};
use crate::credential::SigningContext;
use crate::FinanceError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const GET_TAX_LIST: &str = "/tax/info/getTaxList";
const GET_REPORT: &str = "/tax/info/getReport";

/// Customer, tax period and optional tax code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxRequest {
    /// Customer identifier.
    pub customer_id: String,
    /// Tax period.
    pub period: String,
    /// Tax type code; not sent when absent.
    pub tax_code: Option<String>,
}

impl TaxRequest {
    /// Request covering every tax of the period.
    pub fn new(customer_id: impl Into<String>, period: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            period: period.into(),
            tax_code: None,
        }
    }

    /// Restrict to one tax code.
    pub fn tax_code(mut self, tax_code: impl Into<String>) -> Self {
        self.tax_code = Some(tax_code.into());
        self
    }

    fn context(&self) -> SigningContext {
        SigningContext {
            customer_id: Some(self.customer_id.clone()),
            period: Some(self.period.clone()),
            tax_code: self.tax_code.clone().filter(|c| !c.is_empty()),
            ..SigningContext::default()
        }
    }

    fn query(&self) -> QueryParams {
        QueryParams::new()
            .required("customerId", self.customer_id.as_str())
            .required("period", self.period.as_str())
            .optional("taxCode", self.tax_code.as_deref())
    }
}

/// Declaration summary for one tax type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaxSummary {
    /// Tax name.
    pub tax_name: String,
    /// Tax type code; not sent when absent.
    pub tax_code: String,
    /// Sales for the period.
    pub current_sales: f64,
    /// Input tax.
    pub input_tax: f64,
    /// Closing tax credit.
    pub final_tax_credit: f64,
    /// Cumulative sales.
    pub cumulative_sales: f64,
    /// Prepaid amount.
    pub prepayment_amount: f64,
    /// Total amount.
    pub total_amount: f64,
    /// Net profit.
    pub net_profit: f64,
    /// Cumulative non-operating sales.
    pub out_of_business_cumulative_sales: f64,
    /// Filing date.
    pub post_date: String,
    /// Declaration state.
    pub declaration_state: String,
    /// Tax payable (positive) or refundable (negative).
    pub credit_tax: f64,
    /// Sales revenue for the period.
    pub current_sales_revenue: f64,
    /// Total income.
    pub income_total_amount: f64,
    /// Total profit.
    pub profit_total_amount: f64,
    /// Income tax relief.
    pub income_relief_tax: f64,
    /// Filing deadline.
    pub dead_line: String,
    /// Tax period.
    pub period: String,
    /// Cumulative net profit.
    pub total_net_profit: f64,
    /// Prior net profit.
    pub pre_net_profit: f64,
    /// 1 declared, 2 declared unpaid, 3 paid, 4 partially paid, 5 declared with deferred payment.
    pub pay_status: i64,
    /// `yyyy-MM-dd`
    pub period_begin: String,
    /// `yyyy-MM-dd`
    pub period_end: String,
    /// Amount paid.
    pub pay_amt: f64,
    /// Tax copy state.
    pub copy_tax_state: String,
    /// Card clearing state.
    pub clear_card_state: String,
    /// Surcharges payable alongside this tax.
    pub fjss: Vec<Surcharge>,
}

/// One surcharge levied with a tax.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Surcharge {
    /// Levy item code.
    pub zsxmdm: String,
    /// Surcharge name.
    pub name: String,
    /// Surcharge amount.
    pub value: f64,
}

/// Filed report data for one tax type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaxReport {
    /// Period start date.
    pub period_begin: String,
    /// Period end date.
    pub period_end: String,
    /// Filing date.
    pub post_date: String,
    /// Tax type.
    pub tax_type_enum: String,
    /// Report sheets.
    #[serde(rename = "reportDTOMap")]
    pub report_dto_map: Vec<ReportSheets>,
    /// Additional report parameters.
    pub other_param_map: HashMap<String, serde_json::Value>,
}

/// Report sheets keyed by sheet type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSheets {
    /// Quarterly surcharge attachment.
    #[serde(rename = "OT_ATTACH_SEASON")]
    pub attach_season: ReportSheet,
}

/// One report sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportSheet {
    /// Sheet header.
    pub head: ReportSheetHead,
    /// Sheet lines.
    pub body_list: Vec<ReportLine>,
}

/// Report sheet header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportSheetHead {
    /// Customer identifier.
    pub customer_id: String,
    /// Declaration record identifier.
    pub declaration_state_id: String,
    /// Tax period.
    pub period: String,
    /// Origin of the report data.
    pub report_source: i64,
    /// Read-only marker.
    pub read_only: i64,
    /// Taxpayer identification number.
    pub taxpayer_no: String,
    /// Taxpayer name.
    pub taxpayer_name: String,
    /// Fill date as displayed.
    pub fill_date_show: String,
    /// Amount unit.
    pub amount_unit: String,
    /// Declaration date display flag.
    pub declare_date_show: i64,
    /// Tax period as displayed.
    pub tax_period_show: String,
    /// Tax type code; not sent when absent.
    pub tax_code: String,
    /// Report identifier.
    pub report_id: String,
    /// Period start date.
    pub period_begin: String,
    /// Period end date.
    pub period_end: String,
    /// Report template identifier.
    pub template_id: String,
}

/// One line of a report sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportLine {
    /// Line identifier.
    pub id: i64,
    /// Customer identifier.
    pub customer_id: String,
    /// Declaration record identifier.
    pub declaration_state_id: i64,
    /// Tax period.
    pub period: String,
    /// Origin of the report data.
    pub report_source: i64,
    /// Item code.
    pub item_code: String,
    /// Item index.
    pub item_index: i64,
    /// Displayed line number.
    pub item_line_show: i64,
    /// Line number.
    pub item_line: i64,
    /// Line column.
    pub item_line_char: i64,
    /// Read-only marker.
    pub read_only: String,
    /// Display style.
    pub display_style: i64,
    /// Indentation level.
    pub indent: i64,
    /// Amount at period start.
    pub period_start_amount: f64,
    /// Amount for the period.
    pub period_amount: f64,
    /// Deductible amount.
    pub period_should_minus_amount: f64,
    /// Deducted amount.
    pub period_actual_minus_amount: f64,
    /// Amount at period end.
    pub period_end_amount: f64,
    /// Reduction amount.
    pub period_reduction_amount: f64,
    /// Line number on the declaration form.
    pub item_line_show_for_declare: String,
}

/// Tax endpoints.
pub struct TaxService<'a> {
    client: &'a ApiClient,
}

impl<'a> TaxService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Declared taxes for a customer and period.
    pub fn get_tax_list(&self, request: &TaxRequest) -> Result<Vec<TaxSummary>, FinanceError> {
        self.client
            .get_query(GET_TAX_LIST, request.context(), &request.query())
    }

    /// Filed report sheets for a customer, period and tax code.
    pub fn get_report(&self, request: &TaxRequest) -> Result<Vec<TaxReport>, FinanceError> {
        self.client
            .get_query(GET_REPORT, request.context(), &request.query())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use url::Url;

    #[test]
    fn test_context_signs_customer_period_and_code() {
        let request = TaxRequest::new("c1", "2024-03").tax_code("10101");
        assert_eq!(
            request.context(),
            SigningContext::empty()
                .customer("c1")
                .period("2024-03")
                .tax_code("10101")
        );
    }

    #[test]
    fn test_empty_tax_code_dropped() {
        let request = TaxRequest::new("c1", "2024-03").tax_code("");
        assert!(request.context().tax_code.is_none());

        let mut url = Url::parse("https://example.com/x").unwrap();
        request.query().apply(&mut url);
        assert_eq!(url.query(), Some("customerId=c1&period=2024-03"));
    }

    #[test]
    fn test_tax_summary_parse() {
        let summary: TaxSummary = serde_json::from_value(json!({
            "taxName": "增值税",
            "taxCode": "10101",
            "payStatus": 3,
            "fjss": [{"zsxmdm": "10109", "name": "城建税", "value": 12.5}]
        }))
        .unwrap();

        assert_eq!(summary.tax_code, "10101");
        assert_eq!(summary.pay_status, 3);
        assert_eq!(summary.fjss[0].value, 12.5);
    }

    #[test]
    fn test_report_parse() {
        let report: TaxReport = serde_json::from_value(json!({
            "periodBegin": "2024-01-01",
            "periodEnd": "2024-03-31",
            "taxTypeEnum": "VAT",
            "reportDTOMap": [{
                "OT_ATTACH_SEASON": {
                    "head": {"customerId": "c1", "taxCode": "10101", "readOnly": 1},
                    "bodyList": [{"itemCode": "A1", "itemLine": 1, "periodAmount": 3.0}]
                }
            }],
            "otherParamMap": {}
        }))
        .unwrap();

        let sheet = &report.report_dto_map[0].attach_season;
        assert_eq!(sheet.head.tax_code, "10101");
        assert_eq!(sheet.head.read_only, 1);
        assert_eq!(sheet.body_list[0].item_code, "A1");
        assert_eq!(sheet.body_list[0].period_amount, 3.0);
        assert!(report.other_param_map.is_empty());
    }
}
