use crate::annotation::FieldDelegation;
use crate::schema::SchemaCatalog;
use std::collections::HashMap;

/// The gateway-side delegation configuration: the gateway's own type
/// catalog plus the [`FieldDelegation`] attached to each annotated field.
///
/// Built once with
/// [`DelegationConfigBuilder`](crate::annotation::DelegationConfigBuilder)
/// and read-only afterwards.
#[derive(Clone, Debug)]
pub struct DelegationConfig {
    // parent type name -> field name -> delegation
    pub(super) delegations: HashMap<String, HashMap<String, FieldDelegation>>,
    pub(super) gateway_schema: SchemaCatalog,
}
impl DelegationConfig {
    /// Every annotated field as `(parent type, field name, delegation)`.
    pub fn delegations(&self) -> impl Iterator<Item = (&str, &str, &FieldDelegation)> {
        self.delegations.iter().flat_map(|(type_name, fields)| {
            fields.iter().map(move |(field_name, delegation)| {
                (type_name.as_str(), field_name.as_str(), delegation)
            })
        })
    }

    pub fn gateway_schema(&self) -> &SchemaCatalog {
        &self.gateway_schema
    }

    /// Indicates whether `type_name` is a root operation type of the
    /// gateway schema.
    pub fn is_root_operation_type(&self, type_name: &str) -> bool {
        self.gateway_schema.root_operation_kind(type_name).is_some()
    }

    /// The delegation declared on `parent_type.field_name`, if any.
    pub fn lookup_annotation(
        &self,
        parent_type: &str,
        field_name: &str,
    ) -> Option<&FieldDelegation> {
        self.delegations
            .get(parent_type)
            .and_then(|fields| fields.get(field_name))
    }
}
