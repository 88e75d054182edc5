//! Tailored audiences.

use crate::rest::property::{Property, Transform};
use crate::rest::resource::{Persistence, ResourceKind};

/// An audience built from customer lists, web or app activity.
#[derive(Debug)]
pub struct TailoredAudience;

impl ResourceKind for TailoredAudience {
    const NAME: &'static str = "TailoredAudience";
    const PROPERTIES: &'static [Property] = &[
        Property::readonly("id"),
        Property::readonly("created_at").transform(Transform::Time),
        Property::readonly("updated_at").transform(Transform::Time),
        Property::readonly("deleted").transform(Transform::Bool),
        Property::readonly("audience_size").transform(Transform::Int),
        Property::readonly("audience_type"),
        Property::readonly("metadata").transform(Transform::Object),
        Property::readonly("partner_source"),
        Property::readonly("reasons_not_targetable").transform(Transform::List),
        Property::readonly("targetable").transform(Transform::Bool),
        Property::readonly("targetable_types").transform(Transform::List),
        Property::writable("name"),
        Property::writable("list_type"),
    ];
    const COLLECTION_PATH: Option<&'static str> =
        Some("/{version}/accounts/{account_id}/tailored_audiences");
    const ITEM_PATH: Option<&'static str> =
        Some("/{version}/accounts/{account_id}/tailored_audiences/{id}");
}

impl Persistence for TailoredAudience {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Client;
    use crate::config::{ClientConfig, Credentials};
    use crate::rest::account::Account;
    use crate::rest::property::PropertyValue;
    use crate::rest::resource::Resource;
    use serde_json::json;

    #[test]
    fn test_response_coercion() {
        let credentials = Credentials::new("ck", "cs", "at", "ats").unwrap();
        let account = Account::new(Client::new(ClientConfig::new(credentials)).unwrap(), "abc");
        let mut audience = Resource::<TailoredAudience>::new(&account);

        audience.from_response(&json!({
            "id": "abc2",
            "name": "Customers",
            "targetable": "true",
            "targetable_types": "CRM",
            "reasons_not_targetable": ["TOO_SMALL"],
        }));

        assert_eq!(
            audience.get("targetable").and_then(PropertyValue::as_bool),
            Some(true)
        );
        assert_eq!(
            audience.get("targetable_types").and_then(PropertyValue::as_list),
            Some(&[json!("CRM")][..])
        );
        assert_eq!(audience.to_params().len(), 1);
    }
}
