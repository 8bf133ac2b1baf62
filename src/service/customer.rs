//! Customer management endpoints.

use crate::client::ApiClient;
use crate::credential::SigningContext;
use crate::FinanceError;
use serde::{Deserialize, Serialize};

const QUERY_CUSTOMERS: &str = "/manage/customer/queryCustomers";
const ADD_CUSTOMER: &str = "/manage/customer/addCustomer";
const BATCH_ASSIGN_ROLES: &str = "/manage/customer/batchAssignRoles";
const UPDATE_CUSTOMER: &str = "/manage/customer/updateCustomer";

/// Customer search request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryCustomersRequest {
    /// Customer identifiers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub customer_ids: Vec<String>,
    /// Page number, starting at 1.
    pub page_no: u32,
    /// Rows per page.
    pub page_size: u32,
    /// Fuzzy match criteria.
    #[serde(default)]
    pub customer_like_criteria: CustomerLikeCriteria,
}

/// Fuzzy match criteria; empty fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerLikeCriteria {
    /// Short name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Registered full name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub full_name: String,
    /// Taxpayer identification number.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tax_no: String,
}

/// One page of customers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerPage {
    /// Paging position.
    pub pager: Pager,
    /// Total matching customers.
    pub total: i64,
    /// Matching customers.
    pub customer_list: Vec<CustomerInfo>,
}

/// Paging position echoed by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pager {
    /// Current page.
    pub current_page: i64,
    /// Rows per page.
    pub page_size: i64,
}

/// Customer record as returned by the search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerInfo {
    /// Customer identifier.
    pub customer_id: String,
    /// Industry category.
    pub industry_category: String,
    /// Industry type.
    pub industry_type: String,
    /// Short name.
    pub name: String,
    /// Registered full name.
    pub full_name: String,
    /// Customer number.
    pub customer_no: String,
    /// Taxpayer identification number.
    pub tax_no: String,
    /// Region code.
    pub location_code: String,
    /// Taxpayer type.
    pub tax_type: String,
    /// Depth in the hierarchy.
    pub level: i64,
    /// Customer status.
    pub status: i64,
    /// Customer type.
    pub customer_type: i64,
    /// Registered address.
    pub address: String,
    /// Owning department.
    pub department_id: i64,
    /// Assigned staff.
    pub account_list: Vec<AccountAssignment>,
}

/// Staff member assigned to a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountAssignment {
    /// Staff account identifier.
    pub account_id: String,
    /// Staff relationship type.
    pub relationship_type: i64,
    /// Staff login name.
    pub login_name: String,
}

/// Create a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCustomerRequest {
    /// Name of the new customer.
    pub customer_name: String,
    /// Login name of the operating staff member.
    pub operator_login_name: String,
}

/// Assign staff roles across several customers at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAssignRolesRequest {
    /// Customers to update.
    pub customer_id_list: Vec<String>,
    /// Login name of the operating staff member.
    pub operator_login_name: String,
    /// Staff per relationship type.
    pub role_assignment_list: Vec<RoleAssignment>,
}

/// Staff list for one relationship type.
///
/// Relationship types: 1 service consultant, 2 other service staff, 3 tax
/// accountant, 4 financial accountant, 5 audit accountant, 6 payment owner,
/// 7 account manager, 8 invoicing clerk. An empty `login_name_list` removes
/// the assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignment {
    /// Staff relationship type.
    pub relationship_type: i64,
    /// Staff login names.
    pub login_name_list: Vec<String>,
}

/// Replace the basic details of a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    /// Customer identifier.
    pub customer_id: String,
    /// Login name of the operating staff member.
    pub operator_login_name: String,
    /// Customer number.
    pub customer_no: String,
    /// Short name.
    pub name: String,
    /// Registered full name.
    pub full_name: String,
    /// Taxpayer identification number.
    pub tax_no: String,
    /// Industry category.
    pub industry_category: String,
    /// Industry type.
    pub industry_type: String,
    /// Region code.
    pub location_code: String,
}

/// Customer endpoints.
pub struct Customers<'a> {
    client: &'a ApiClient,
}

impl<'a> Customers<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Search customers. Signed with the session customer, if configured.
    pub fn query_customers(
        &self,
        request: &QueryCustomersRequest,
    ) -> Result<CustomerPage, FinanceError> {
        self.client
            .post_json(QUERY_CUSTOMERS, self.client.session_context(), request)
    }

    /// Create a customer; returns the body string from the API.
    pub fn add_customer(&self, request: &AddCustomerRequest) -> Result<String, FinanceError> {
        self.client
            .post_json(ADD_CUSTOMER, SigningContext::empty(), request)
    }

    /// Assign staff to customers in bulk.
    pub fn batch_assign_roles(
        &self,
        request: &BatchAssignRolesRequest,
    ) -> Result<String, FinanceError> {
        self.client
            .post_json(BATCH_ASSIGN_ROLES, SigningContext::empty(), request)
    }

    /// Update a customer's master data.
    pub fn update_customer(&self, request: &UpdateCustomerRequest) -> Result<String, FinanceError> {
        self.client
            .post_json(UPDATE_CUSTOMER, SigningContext::empty(), request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_request_omits_empty_fields() {
        let request = QueryCustomersRequest {
            page_no: 1,
            page_size: 20,
            customer_like_criteria: CustomerLikeCriteria {
                name: "acme".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "pageNo": 1,
                "pageSize": 20,
                "customerLikeCriteria": {"name": "acme"}
            })
        );
    }

    #[test]
    fn test_query_request_with_ids() {
        let request = QueryCustomersRequest {
            customer_ids: vec!["c1".to_string(), "c2".to_string()],
            page_no: 2,
            page_size: 50,
            ..Default::default()
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["customerIds"], json!(["c1", "c2"]));
        assert_eq!(value["customerLikeCriteria"], json!({}));
    }

    #[test]
    fn test_customer_page_parses_partial_rows() {
        let page: CustomerPage = serde_json::from_value(json!({
            "pager": {"currentPage": 1, "pageSize": 20},
            "total": 1,
            "customerList": [{
                "customerId": "c1",
                "name": "Acme",
                "taxNo": "91310000",
                "accountList": [{"accountId": "a1", "relationshipType": 4, "loginName": "li"}]
            }]
        }))
        .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.pager.page_size, 20);
        let customer = &page.customer_list[0];
        assert_eq!(customer.customer_id, "c1");
        assert_eq!(customer.full_name, "");
        assert_eq!(customer.account_list[0].relationship_type, 4);
    }

    #[test]
    fn test_batch_assign_wire_names() {
        let request = BatchAssignRolesRequest {
            customer_id_list: vec!["c1".to_string()],
            operator_login_name: "admin".to_string(),
            role_assignment_list: vec![RoleAssignment {
                relationship_type: 3,
                login_name_list: vec![],
            }],
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "customerIdList": ["c1"],
                "operatorLoginName": "admin",
                "roleAssignmentList": [{"relationshipType": 3, "loginNameList": []}]
            })
        );
    }

    #[test]
    fn test_update_request_sends_all_fields() {
        let value = serde_json::to_value(UpdateCustomerRequest::default()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 9);
        assert!(object.contains_key("locationCode"));
    }
}
