//! Builds a [`Registry`] from a collection's properties.
//!
//! Every fatal condition returns a [`ConfigError`]. Everything else is logged
//! with `warn!` and kept in [`Registry::warnings`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, info, warn};

use crate::config::CollectionSettings;
use crate::errors::ConfigError;
use crate::fields::{
    BooleanConfig, DateConfig, DateUnit, FieldDefinition, FieldKind, OrFacetConfig, QueryConfig,
    RangeConfig, RegularFacetConfig, SearchField, SortConfig, SortableField, ValidationKind,
};
use crate::properties::Properties;
use crate::utils::split_list;

use super::{ParamCodes, Registry, FIELDSET_DEFAULT, FIELDSET_EMPTY};

pub const PROPERTY_PARAM_QUERY: &str = "panl.param.query";
pub const PROPERTY_PARAM_SORT: &str = "panl.param.sort";
pub const PROPERTY_PARAM_PAGE: &str = "panl.param.page";
pub const PROPERTY_PARAM_NUMROWS: &str = "panl.param.numrows";
pub const PROPERTY_PARAM_QUERY_OPERAND: &str = "panl.param.query.operand";
pub const PROPERTY_PARAM_PASSTHROUGH: &str = "panl.param.passthrough";
pub const PROPERTY_LPSE_ORDER: &str = "panl.lpse.order";
pub const PROPERTY_FACET_ORDER: &str = "panl.lpse.facetorder";
pub const PROPERTY_IGNORE: &str = "panl.lpse.ignore";

const PREFIX_FACET: &str = "panl.facet.";
const PREFIX_FIELD: &str = "panl.field.";
const PREFIX_TYPE: &str = "panl.type.";
const PREFIX_NAME: &str = "panl.name.";
const PREFIX_PREFIX: &str = "panl.prefix.";
const PREFIX_SUFFIX: &str = "panl.suffix.";
const PREFIX_OR_FACET: &str = "panl.or.facet.";
const PREFIX_OR_SEPARATOR: &str = "panl.or.separator.";
const PREFIX_OR_ALWAYS: &str = "panl.or.always.";
const PREFIX_RANGE_FACET: &str = "panl.range.facet.";
const PREFIX_RANGE_MIN: &str = "panl.range.min.";
const PREFIX_RANGE_MAX: &str = "panl.range.max.";
const PREFIX_RANGE_INFIX: &str = "panl.range.infix.";
const PREFIX_RANGE_MIDFIX: &str = "panl.range.midfix.";
const PREFIX_RANGE_PREFIX: &str = "panl.range.prefix.";
const PREFIX_RANGE_SUFFIX: &str = "panl.range.suffix.";
const PREFIX_RANGE_MIN_VALUE: &str = "panl.range.min.value.";
const PREFIX_RANGE_MAX_VALUE: &str = "panl.range.max.value.";
const PREFIX_RANGE_MIN_WILDCARD: &str = "panl.range.min.wildcard.";
const PREFIX_RANGE_MAX_WILDCARD: &str = "panl.range.max.wildcard.";
const PREFIX_RANGE_SUPPRESS: &str = "panl.range.suppress.";
const PREFIX_BOOL: &str = "panl.bool.";
const PREFIX_DATE: &str = "panl.date.";
const PREFIX_MULTIVALUE: &str = "panl.multivalue.";
const PREFIX_MULTIVALUE_SEPARATOR: &str = "panl.multivalue.separator.";
const PREFIX_SEARCH: &str = "panl.search.";
const PREFIX_SEARCH_BOOST: &str = "panl.search.boost.";
const PREFIX_WHEN: &str = "panl.when.";
const PREFIX_UNLESS: &str = "panl.unless.";
const PREFIX_RESULTS_FIELDS: &str = "panl.results.fields.";
const PROPERTY_SORT_FIELDS: &str = "panl.sort.fields";

const ENGINE_TYPE_DATE: &str = "solr.DatePointField";
const ENGINE_TYPE_BOOL: &str = "solr.BoolField";

/// Property prefixes the builder understands. Any other `panl.` key is
/// reported as a warning.
const KNOWN_PREFIXES: &[&str] = &[
    PREFIX_FACET,
    PREFIX_FIELD,
    PREFIX_TYPE,
    PREFIX_NAME,
    PREFIX_PREFIX,
    PREFIX_SUFFIX,
    PREFIX_OR_FACET,
    PREFIX_OR_SEPARATOR,
    PREFIX_OR_ALWAYS,
    "panl.range.",
    PREFIX_BOOL,
    PREFIX_DATE,
    PREFIX_MULTIVALUE,
    PREFIX_SEARCH,
    PREFIX_WHEN,
    PREFIX_UNLESS,
    PREFIX_RESULTS_FIELDS,
    "panl.param.",
    "panl.lpse.",
    "panl.form.",
    "panl.include.",
    "panl.decimal.",
    PROPERTY_SORT_FIELDS,
];

/// Sub-key prefixes that only make sense on a range facet.
const RANGE_ONLY_PREFIXES: &[&str] = &[
    PREFIX_RANGE_MIN,
    PREFIX_RANGE_MAX,
    PREFIX_RANGE_INFIX,
    PREFIX_RANGE_MIDFIX,
    PREFIX_RANGE_PREFIX,
    PREFIX_RANGE_SUFFIX,
    PREFIX_RANGE_SUPPRESS,
];

/// Sub-key prefixes that only make sense on an OR facet.
const OR_ONLY_PREFIXES: &[&str] = &[PREFIX_OR_SEPARATOR, PREFIX_OR_ALWAYS];

impl Registry {
    /// Build and validate a collection registry.
    ///
    /// # Arguments
    ///
    /// * `collection_name` - Name of the collection in the search engine
    /// * `collection_uri` - First path segment of the collection's URIs
    /// * `properties` - The collection's properties
    ///
    /// # Returns
    ///
    /// * `Ok(Registry)` - The immutable registry, with any non-fatal warnings
    /// * `Err(ConfigError)` - If the configuration cannot be served
    pub fn build(
        collection_name: &str,
        collection_uri: &str,
        properties: &Properties,
    ) -> Result<Registry, ConfigError> {
        let builder = RegistryBuilder {
            collection: collection_name,
            properties,
            settings: CollectionSettings::from_properties(properties)?,
            definitions: HashMap::new(),
            warnings: Vec::new(),
        };
        let registry = builder.build(collection_name, collection_uri)?;

        info!(
            collection = %registry.collection_name,
            uri = %registry.collection_uri,
            fields = registry.lpse_order.len(),
            facets = registry.facet_order.len(),
            warnings = registry.warnings.len(),
            "Collection registry built"
        );

        Ok(registry)
    }
}

struct RegistryBuilder<'a> {
    collection: &'a str,
    properties: &'a Properties,
    settings: CollectionSettings,
    definitions: HashMap<String, FieldDefinition>,
    warnings: Vec<String>,
}

impl<'a> RegistryBuilder<'a> {
    fn build(mut self, collection_name: &str, collection_uri: &str) -> Result<Registry, ConfigError> {
        self.warn_unknown_properties();

        let params = self.param_codes()?;
        self.declare_facets()?;
        self.declare_fields()?;
        self.declare_params(&params)?;

        let lpse_order = self.lpse_order(&params)?;
        let facet_order = self.facet_order(&lpse_order);
        let ignored = self.ignored(&lpse_order);
        let when = self.code_sets(PREFIX_WHEN);
        let unless = self.code_sets(PREFIX_UNLESS);
        let fieldsets = self.fieldsets();

        Ok(Registry {
            collection_name: collection_name.to_string(),
            collection_uri: collection_uri.to_string(),
            settings: self.settings,
            definitions: self.definitions,
            lpse_order,
            facet_order,
            ignored,
            when,
            unless,
            fieldsets,
            params,
            warnings: self.warnings,
        })
    }

    fn warn(&mut self, message: String) {
        warn!(collection = %self.collection, "{}", message);
        self.warnings.push(message);
    }

    fn check_length(&self, code: &str) -> Result<(), ConfigError> {
        if code.chars().count() == self.settings.lpse_length {
            Ok(())
        } else {
            Err(ConfigError::code_length(code, self.settings.lpse_length))
        }
    }

    fn insert(&mut self, definition: FieldDefinition) -> Result<(), ConfigError> {
        self.check_length(&definition.code)?;
        if self.definitions.contains_key(&definition.code) {
            return Err(ConfigError::duplicate_code(definition.code));
        }
        debug!(
            code = %definition.code,
            kind = definition.kind.name(),
            field = %definition.backing_name,
            "Field declared"
        );
        self.definitions.insert(definition.code.clone(), definition);
        Ok(())
    }

    /// Raw value of `<prefix><code>`, keeping surrounding whitespace.
    fn raw(&self, prefix: &str, code: &str) -> Option<String> {
        self.properties
            .get(&format!("{}{}", prefix, code))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn flag(&self, prefix: &str, code: &str) -> bool {
        self.properties
            .get_bool(&format!("{}{}", prefix, code), false)
    }

    fn warn_unknown_properties(&mut self) {
        let unknown: Vec<String> = self
            .properties
            .iter()
            .map(|(key, _)| key)
            .filter(|key| key.starts_with("panl."))
            .filter(|key| !KNOWN_PREFIXES.iter().any(|prefix| key.starts_with(prefix)))
            .map(str::to_string)
            .collect();
        for key in unknown {
            self.warn(format!("Unknown property '{}' ignored", key));
        }
    }

    fn param_codes(&self) -> Result<ParamCodes, ConfigError> {
        let require = |key: &str| -> Result<String, ConfigError> {
            let code = self.properties.require(key)?;
            self.check_length(code)?;
            Ok(code.to_string())
        };

        let pass_through = match self.properties.get_non_blank(PROPERTY_PARAM_PASSTHROUGH) {
            Some(code) => {
                self.check_length(code)?;
                Some(code.to_string())
            }
            None => None,
        };

        Ok(ParamCodes {
            query: require(PROPERTY_PARAM_QUERY)?,
            sort: require(PROPERTY_PARAM_SORT)?,
            page: require(PROPERTY_PARAM_PAGE)?,
            num_rows: require(PROPERTY_PARAM_NUMROWS)?,
            query_operand: require(PROPERTY_PARAM_QUERY_OPERAND)?,
            pass_through,
        })
    }

    fn declare_facets(&mut self) -> Result<(), ConfigError> {
        let declared: Vec<(String, String)> = self
            .properties
            .with_prefix(PREFIX_FACET)
            .map(|(code, backing)| (code.to_string(), backing.trim().to_string()))
            .collect();

        for (code, backing) in declared {
            let engine_type = self.raw(PREFIX_TYPE, &code).unwrap_or_default();
            let validation = ValidationKind::from_engine_type(engine_type.trim());
            let kind = self.facet_kind(&code, engine_type.trim())?;
            self.warn_misplaced_keys(&code, &kind);

            let definition = self.describe(FieldDefinition::new(&code, backing, kind), &code);
            self.insert(definition.with_validation(validation))?;
        }
        Ok(())
    }

    fn declare_fields(&mut self) -> Result<(), ConfigError> {
        let declared: Vec<(String, String)> = self
            .properties
            .with_prefix(PREFIX_FIELD)
            .map(|(code, backing)| (code.to_string(), backing.trim().to_string()))
            .collect();

        for (code, backing) in declared {
            let definition = self.describe(FieldDefinition::new(&code, backing, FieldKind::Plain), &code);
            self.insert(definition)?;
        }
        Ok(())
    }

    /// Apply the display name and value affixes shared by facets and fields.
    fn describe(&self, definition: FieldDefinition, code: &str) -> FieldDefinition {
        let definition = match self.properties.get_non_blank(&format!("{}{}", PREFIX_NAME, code)) {
            Some(name) => definition.with_display_name(name),
            None => definition,
        };
        definition.with_affixes(self.raw(PREFIX_PREFIX, code), self.raw(PREFIX_SUFFIX, code))
    }

    /// Determine a facet's kind by precedence: date, boolean, OR, range,
    /// then regular.
    fn facet_kind(&mut self, code: &str, engine_type: &str) -> Result<FieldKind, ConfigError> {
        let is_or = self.flag(PREFIX_OR_FACET, code);
        let is_range = self.flag(PREFIX_RANGE_FACET, code);
        if is_or && is_range {
            return Err(ConfigError::ConflictingFacetKind(code.to_string()));
        }

        if engine_type == ENGINE_TYPE_DATE {
            if is_or {
                self.warn(format!("LPSE code '{}' is a date facet, OR flag ignored", code));
            }
            let config = self.date_config(code);
            return Ok(if is_range {
                FieldKind::DateRangeFacet(config)
            } else {
                FieldKind::DateFacet(config)
            });
        }

        if engine_type == ENGINE_TYPE_BOOL {
            return Ok(FieldKind::BooleanFacet(BooleanConfig {
                true_value: self.raw(PREFIX_BOOL, &format!("{}.true", code)),
                false_value: self.raw(PREFIX_BOOL, &format!("{}.false", code)),
            }));
        }

        if is_or {
            return Ok(FieldKind::OrFacet(OrFacetConfig {
                separator: self.raw(PREFIX_OR_SEPARATOR, code),
                always_or: self.flag(PREFIX_OR_ALWAYS, code),
            }));
        }

        if is_range {
            return self.range_config(code).map(FieldKind::RangeFacet);
        }

        let multivalue_separator = self.raw(PREFIX_MULTIVALUE_SEPARATOR, code);
        Ok(FieldKind::RegularFacet(RegularFacetConfig {
            is_multivalued: self.flag(PREFIX_MULTIVALUE, code) || multivalue_separator.is_some(),
            multivalue_separator,
        }))
    }

    fn range_config(&self, code: &str) -> Result<RangeConfig, ConfigError> {
        let (infix_key, infix) = match self.raw(PREFIX_RANGE_INFIX, code) {
            Some(infix) => (format!("{}{}", PREFIX_RANGE_INFIX, code), Some(infix)),
            None => (
                format!("{}{}", PREFIX_RANGE_MIDFIX, code),
                self.raw(PREFIX_RANGE_MIDFIX, code),
            ),
        };
        if infix.as_deref() == Some("-") {
            return Err(ConfigError::invalid(
                infix_key,
                "the range infix cannot be '-'",
            ));
        }

        let min = self.raw(PREFIX_RANGE_MIN, code).map(|v| v.trim().to_string());
        let max = self.raw(PREFIX_RANGE_MAX, code).map(|v| v.trim().to_string());
        if let (Some(min), Some(max)) = (&min, &max) {
            if let (Ok(low), Ok(high)) = (min.parse::<f64>(), max.parse::<f64>()) {
                if low > high {
                    return Err(ConfigError::invalid(
                        format!("{}{}", PREFIX_RANGE_MIN, code),
                        format!("minimum {} is greater than maximum {}", min, max),
                    ));
                }
            }
        }

        Ok(RangeConfig {
            min,
            max,
            infix,
            range_prefix: self.raw(PREFIX_RANGE_PREFIX, code),
            range_suffix: self.raw(PREFIX_RANGE_SUFFIX, code),
            min_replacement: self.raw(PREFIX_RANGE_MIN_VALUE, code),
            max_replacement: self.raw(PREFIX_RANGE_MAX_VALUE, code),
            min_wildcard: self.flag(PREFIX_RANGE_MIN_WILDCARD, code),
            max_wildcard: self.flag(PREFIX_RANGE_MAX_WILDCARD, code),
            suppress: self.flag(PREFIX_RANGE_SUPPRESS, code),
        })
    }

    fn date_config(&self, code: &str) -> DateConfig {
        let sub_key = |suffix: &str| self.raw(PREFIX_DATE, &format!("{}.{}", code, suffix));
        DateConfig {
            next_indicator: sub_key("next"),
            previous_indicator: sub_key("previous"),
            unit_suffixes: DateUnit::ALL
                .iter()
                .filter_map(|unit| sub_key(unit.property_suffix()).map(|suffix| (suffix, *unit)))
                .collect(),
        }
    }

    fn warn_misplaced_keys(&mut self, code: &str, kind: &FieldKind) {
        let mut misplaced = Vec::new();
        if !matches!(kind, FieldKind::RangeFacet(_)) {
            misplaced.extend(
                RANGE_ONLY_PREFIXES
                    .iter()
                    .map(|prefix| format!("{}{}", prefix, code))
                    .filter(|key| self.properties.get(key).is_some()),
            );
        }
        if !matches!(kind, FieldKind::OrFacet(_)) {
            misplaced.extend(
                OR_ONLY_PREFIXES
                    .iter()
                    .map(|prefix| format!("{}{}", prefix, code))
                    .filter(|key| self.properties.get(key).is_some()),
            );
        }
        for key in misplaced {
            self.warn(format!(
                "Property '{}' has no effect on a {} field",
                key,
                kind.name()
            ));
        }
    }

    fn declare_params(&mut self, params: &ParamCodes) -> Result<(), ConfigError> {
        let query = FieldKind::Query(QueryConfig {
            search_fields: self.search_fields()?,
        });
        let sort = FieldKind::Sort(SortConfig {
            fields: self.sortable_fields(),
        });

        self.insert(FieldDefinition::new(&params.query, "query", query).with_display_name("Query"))?;
        self.insert(FieldDefinition::new(&params.sort, "sort", sort).with_display_name("Sort"))?;

        let page = FieldDefinition::new(&params.page, "page", FieldKind::Page)
            .with_display_name("Page")
            .with_affixes(
                self.raw(PROPERTY_PARAM_PAGE, ".prefix"),
                self.raw(PROPERTY_PARAM_PAGE, ".suffix"),
            );
        self.insert(page)?;

        let num_rows = FieldDefinition::new(&params.num_rows, "numrows", FieldKind::NumRows)
            .with_display_name("Results per page")
            .with_affixes(
                self.raw(PROPERTY_PARAM_NUMROWS, ".prefix"),
                self.raw(PROPERTY_PARAM_NUMROWS, ".suffix"),
            );
        self.insert(num_rows)?;

        self.insert(
            FieldDefinition::new(&params.query_operand, "q.op", FieldKind::QueryOperand)
                .with_display_name("Query operand"),
        )?;

        if let Some(code) = &params.pass_through {
            self.insert(
                FieldDefinition::new(code, "passthrough", FieldKind::PassThrough)
                    .with_display_name("Pass through"),
            )?;
        }
        Ok(())
    }

    fn search_fields(&mut self) -> Result<Vec<SearchField>, ConfigError> {
        let declared: Vec<(String, String)> = self
            .properties
            .with_prefix(PREFIX_SEARCH)
            .filter(|(suffix, _)| !suffix.starts_with("boost."))
            .map(|(code, backing)| (code.to_string(), backing.trim().to_string()))
            .collect();

        let mut search_fields = Vec::with_capacity(declared.len());
        for (code, backing) in declared {
            if code.chars().count() != self.settings.lpse_length {
                self.warn(format!(
                    "Search code '{}' does not have length {}, ignored",
                    code, self.settings.lpse_length
                ));
                continue;
            }
            let boost = self
                .properties
                .get_parsed::<f64>(&format!("{}{}", PREFIX_SEARCH_BOOST, code))?
                .unwrap_or(1.0);
            search_fields.push(SearchField {
                code,
                backing_name: backing,
                boost,
            });
        }
        Ok(search_fields)
    }

    fn sortable_fields(&mut self) -> Vec<SortableField> {
        let names = self
            .properties
            .get_non_blank(PROPERTY_SORT_FIELDS)
            .map(split_list)
            .unwrap_or_default();

        let mut fields = Vec::with_capacity(names.len());
        for name in names {
            let code = self
                .definitions
                .values()
                .find(|d| d.backing_name == name)
                .map(|d| d.code.clone());
            match code {
                Some(code) => fields.push(SortableField {
                    code,
                    backing_name: name,
                }),
                None => self.warn(format!(
                    "Sort field '{}' is not a declared facet or field, ignored",
                    name
                )),
            }
        }
        fields
    }

    fn lpse_order(&mut self, params: &ParamCodes) -> Result<Vec<String>, ConfigError> {
        let codes = split_list(self.properties.require(PROPERTY_LPSE_ORDER)?);

        let mut mandatory: Vec<&str> = vec![
            params.query.as_str(),
            params.sort.as_str(),
            params.page.as_str(),
            params.num_rows.as_str(),
            params.query_operand.as_str(),
        ];

        let mut order: Vec<String> = Vec::with_capacity(codes.len());
        for code in codes {
            if order.contains(&code) {
                self.warn(format!("LPSE code '{}' repeated in {}", code, PROPERTY_LPSE_ORDER));
                continue;
            }
            if !self.definitions.contains_key(&code) {
                self.warn(format!(
                    "LPSE code '{}' in {} is not declared, ignored",
                    code, PROPERTY_LPSE_ORDER
                ));
                continue;
            }
            mandatory.retain(|m| *m != code);
            order.push(code);
        }

        if !mandatory.is_empty() {
            return Err(ConfigError::MissingMandatoryCodes(
                mandatory.into_iter().map(str::to_string).collect(),
            ));
        }

        let mut unordered: Vec<String> = self
            .definitions
            .keys()
            .filter(|code| !order.contains(code))
            .cloned()
            .collect();
        unordered.sort();
        for code in unordered {
            self.warn(format!(
                "LPSE code '{}' is declared but missing from {}, it will never be parsed",
                code, PROPERTY_LPSE_ORDER
            ));
            self.definitions.remove(&code);
        }

        Ok(order)
    }

    fn facet_order(&mut self, lpse_order: &[String]) -> Vec<String> {
        let facets: Vec<String> = lpse_order
            .iter()
            .filter(|code| self.definitions.get(*code).is_some_and(|d| d.kind.is_facet()))
            .cloned()
            .collect();

        let Some(explicit) = self.properties.get_non_blank(PROPERTY_FACET_ORDER).map(split_list) else {
            return facets;
        };

        let mut order: Vec<String> = Vec::with_capacity(facets.len());
        for code in explicit {
            if facets.contains(&code) && !order.contains(&code) {
                order.push(code);
            } else {
                self.warn(format!(
                    "LPSE code '{}' in {} is not a facet in {}, ignored",
                    code, PROPERTY_FACET_ORDER, PROPERTY_LPSE_ORDER
                ));
            }
        }
        for code in facets {
            if !order.contains(&code) {
                self.warn(format!(
                    "Facet '{}' missing from {}, appended",
                    code, PROPERTY_FACET_ORDER
                ));
                order.push(code);
            }
        }
        order
    }

    fn ignored(&mut self, lpse_order: &[String]) -> BTreeSet<String> {
        let codes = self
            .properties
            .get_non_blank(PROPERTY_IGNORE)
            .map(split_list)
            .unwrap_or_default();

        let mut ignored = BTreeSet::new();
        for code in codes {
            if lpse_order.contains(&code) {
                ignored.insert(code);
            } else {
                self.warn(format!(
                    "Ignored LPSE code '{}' is not in {}",
                    code, PROPERTY_LPSE_ORDER
                ));
            }
        }
        ignored
    }

    fn code_sets(&mut self, prefix: &str) -> HashMap<String, BTreeSet<String>> {
        let declared: Vec<(String, Vec<String>)> = self
            .properties
            .with_prefix(prefix)
            .map(|(code, value)| (code.to_string(), split_list(value)))
            .collect();

        let mut sets = HashMap::new();
        for (code, others) in declared {
            if !self.definitions.get(&code).is_some_and(|d| d.kind.is_facet()) {
                self.warn(format!("Property '{}{}' does not name a facet, ignored", prefix, code));
                continue;
            }
            let mut set = BTreeSet::new();
            for other in others {
                if self.definitions.contains_key(&other) {
                    set.insert(other);
                } else {
                    self.warn(format!(
                        "Property '{}{}' names unknown LPSE code '{}'",
                        prefix, code, other
                    ));
                }
            }
            if !set.is_empty() {
                sets.insert(code, set);
            }
        }
        sets
    }

    fn fieldsets(&self) -> BTreeMap<String, Option<Vec<String>>> {
        let mut fieldsets: BTreeMap<String, Option<Vec<String>>> = self
            .properties
            .with_prefix(PREFIX_RESULTS_FIELDS)
            .map(|(name, fields)| (name.to_string(), Some(split_list(fields))))
            .collect();
        fieldsets.entry(FIELDSET_DEFAULT.to_string()).or_insert(None);
        fieldsets
            .entry(FIELDSET_EMPTY.to_string())
            .or_insert_with(|| Some(Vec::new()));
        fieldsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::test_support;

    fn minimal() -> Properties {
        Properties::parse(
            "panl.lpse.length=1\n\
             panl.param.query=q\n\
             panl.param.sort=s\n\
             panl.param.page=p\n\
             panl.param.numrows=n\n\
             panl.param.query.operand=o\n\
             panl.facet.b=brand\n\
             panl.lpse.order=b,q,s,p,n,o\n",
        )
    }

    #[test]
    fn test_build_fixture() {
        let registry = test_support::registry();

        assert_eq!(registry.lpse_order().concat(), "bcwgidtqspnoz");
        assert_eq!(registry.facet_order().concat(), "cbwgid");
        assert!(registry.is_ignored("d"));
        assert!(registry.warnings().iter().any(|w| w.contains("appended")));
        assert_eq!(registry.params().pass_through.as_deref(), Some("z"));

        let weight = registry.definition("w").unwrap();
        assert!(matches!(weight.kind, FieldKind::RangeFacet(_)));
        assert_eq!(weight.validation, ValidationKind::Number);
        assert!(matches!(
            registry.definition("i").unwrap().kind,
            FieldKind::BooleanFacet(_)
        ));
        assert!(matches!(
            registry.definition("d").unwrap().kind,
            FieldKind::DateFacet(_)
        ));
        assert_eq!(registry.definition("b").unwrap().display_name, "Brand");
    }

    #[test]
    fn test_sortable_and_search_fields() {
        let registry = test_support::registry();
        let FieldKind::Sort(sort) = &registry.definition("s").unwrap().kind else {
            panic!("expected sort field");
        };
        assert_eq!(sort.field("t").unwrap().backing_name, "title");
        assert_eq!(sort.field("b").unwrap().backing_name, "brand");

        let FieldKind::Query(query) = &registry.definition("q").unwrap().kind else {
            panic!("expected query field");
        };
        assert_eq!(query.search_field("x").unwrap().boost, 2.0);
    }

    #[test]
    fn test_missing_lpse_length() {
        let mut properties = minimal();
        properties.insert("panl.lpse.length", "");
        assert_eq!(
            Registry::build("c", "c", &properties).unwrap_err(),
            ConfigError::missing_property("panl.lpse.length")
        );
    }

    #[test]
    fn test_missing_mandatory_param() {
        let mut properties = minimal();
        properties.insert(PROPERTY_PARAM_SORT, "");
        assert_eq!(
            Registry::build("c", "c", &properties).unwrap_err(),
            ConfigError::missing_property(PROPERTY_PARAM_SORT)
        );
    }

    #[test]
    fn test_mandatory_code_missing_from_order() {
        let mut properties = minimal();
        properties.insert(PROPERTY_LPSE_ORDER, "b,q,s,n");
        assert_eq!(
            Registry::build("c", "c", &properties).unwrap_err(),
            ConfigError::MissingMandatoryCodes(vec!["p".to_string(), "o".to_string()])
        );
    }

    #[test]
    fn test_code_length_enforced() {
        let mut properties = minimal();
        properties.insert("panl.facet.bb", "brand");
        assert_eq!(
            Registry::build("c", "c", &properties).unwrap_err(),
            ConfigError::code_length("bb", 1)
        );
    }

    #[test]
    fn test_duplicate_code() {
        let mut properties = minimal();
        properties.insert("panl.field.b", "body");
        assert_eq!(
            Registry::build("c", "c", &properties).unwrap_err(),
            ConfigError::duplicate_code("b")
        );
    }

    #[test]
    fn test_or_and_range_conflict() {
        let mut properties = minimal();
        properties.insert("panl.or.facet.b", "true");
        properties.insert("panl.range.facet.b", "true");
        assert_eq!(
            Registry::build("c", "c", &properties).unwrap_err(),
            ConfigError::ConflictingFacetKind("b".to_string())
        );
    }

    #[test]
    fn test_dash_infix_rejected() {
        let mut properties = minimal();
        properties.insert("panl.range.facet.b", "true");
        properties.insert("panl.range.infix.b", "-");
        assert!(matches!(
            Registry::build("c", "c", &properties),
            Err(ConfigError::InvalidProperty { .. })
        ));
    }

    #[test]
    fn test_invalid_default_operand() {
        let mut properties = minimal();
        properties.insert("solr.default.query.operand", "*");
        assert!(matches!(
            Registry::build("c", "c", &properties),
            Err(ConfigError::InvalidProperty { .. })
        ));
    }

    #[test]
    fn test_non_fatal_warnings() {
        let mut properties = minimal();
        properties.insert(PROPERTY_LPSE_ORDER, "b,x,q,s,p,n,o");
        properties.insert(PROPERTY_IGNORE, "y");
        properties.insert("panl.or.separator.b", ",");
        properties.insert("panl.colour.b", "red");

        let registry = Registry::build("c", "c", &properties).unwrap();
        let warnings = registry.warnings();
        assert!(warnings.iter().any(|w| w.contains("'x'")));
        assert!(warnings.iter().any(|w| w.contains("'y'")));
        assert!(warnings.iter().any(|w| w.contains("panl.or.separator.b")));
        assert!(warnings.iter().any(|w| w.contains("panl.colour.b")));
    }

    #[test]
    fn test_unordered_code_is_dropped() {
        let mut properties = minimal();
        properties.insert("panl.field.t", "title");

        let registry = Registry::build("c", "c", &properties).unwrap();
        assert!(registry.definition("t").is_none());
        assert!(registry
            .warnings()
            .iter()
            .any(|w| w.contains("'t'") && w.contains("never be parsed")));
    }

    #[test]
    fn test_date_range_facet() {
        let mut properties = minimal();
        properties.insert("panl.type.b", "solr.DatePointField");
        properties.insert("panl.range.facet.b", "true");

        let registry = Registry::build("c", "c", &properties).unwrap();
        assert!(matches!(
            registry.definition("b").unwrap().kind,
            FieldKind::DateRangeFacet(_)
        ));
        assert_eq!(
            registry.definition("b").unwrap().validation,
            ValidationKind::Date
        );
    }

    #[test]
    fn test_default_facet_order() {
        let registry = Registry::build("c", "c", &minimal()).unwrap();
        assert_eq!(registry.facet_order(), ["b".to_string()]);
        assert!(registry.warnings().is_empty());
    }
}
