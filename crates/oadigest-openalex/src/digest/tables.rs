//! Per-entity digest tables
//!
//! Top-level scalars are copied by the engine before these rules run, so
//! tables only list dates, nested promotions and array merges.

use super::rules::{FieldRule, MergeStrategy};
use crate::entity::Entity;

const WORKS: &[FieldRule] = &[
    FieldRule::date("publication_date"),
    FieldRule::date("created_date"),
    FieldRule::date("updated_date"),
    FieldRule::single("pmid", "ids.pmid"),
    FieldRule::single("pmcid", "ids.pmcid"),
    FieldRule::single("mag", "ids.mag"),
    FieldRule::single("apc_paid", "apc_paid.value_usd"),
    FieldRule::single("apc_list", "apc_list.value_usd"),
    FieldRule::single(
        "primary_location_display_name",
        "primary_location.source.display_name",
    ),
    FieldRule::single(
        "primary_location_host_organization_name",
        "primary_location.source.host_organization_name",
    ),
    FieldRule::single("primary_location_landing_page_url", "primary_location.landing_page_url"),
    FieldRule::single("primary_topic_display_name", "primary_topic.display_name"),
    FieldRule::flatten("open_access", "open_access"),
    FieldRule::flatten("percentiles", "citation_normalized_percentile"),
    FieldRule::flatten("biblio", "biblio"),
    FieldRule::join(
        "countries_codes",
        "authorships[].countries[]",
        MergeStrategy::DedupeJoin,
    ),
    FieldRule::join(
        "grants_funder_display_name",
        "grants[].funder_display_name",
        MergeStrategy::DedupeJoin,
    ),
    FieldRule::join("indexed_in", "indexed_in[]", MergeStrategy::DedupeJoin),
    FieldRule::join(
        "corresponding_author_ids",
        "corresponding_author_ids[]",
        MergeStrategy::DedupeJoin,
    ),
    FieldRule::names("authorships_author_display_name", "authorships[].author.display_name"),
    FieldRule::names(
        "authorships_institutions_display_name",
        "authorships[].institutions[].display_name",
    ),
    FieldRule::names("topics_display_name", "topics[].display_name"),
    FieldRule::names("topics_subfield_display_name", "topics[].subfield.display_name"),
    FieldRule::names("topics_field_display_name", "topics[].field.display_name"),
    FieldRule::names("topics_domain_display_name", "topics[].domain.display_name"),
    FieldRule::names("keywords_display_name", "keywords[].display_name"),
    FieldRule::names(
        "sustainable_development_goals_display_name",
        "sustainable_development_goals[].display_name",
    ),
];

const AUTHORS: &[FieldRule] = &[
    FieldRule::date("created_date"),
    FieldRule::date("updated_date"),
    FieldRule::single("orcid", "ids.orcid"),
    FieldRule::single("scopus", "ids.scopus"),
    FieldRule::flatten("summary_stats", "summary_stats"),
    FieldRule::names(
        "last_known_institutions_display_name",
        "last_known_institutions[].display_name",
    ),
    FieldRule::join(
        "last_known_institutions_country_code",
        "last_known_institutions[].country_code",
        MergeStrategy::DedupeJoin,
    ),
    FieldRule::names("topics_display_name", "topics[].display_name"),
    FieldRule::names(
        "display_name_alternatives",
        "display_name_alternatives[]",
    ),
];

const SOURCES: &[FieldRule] = &[
    FieldRule::date("created_date"),
    FieldRule::date("updated_date"),
    FieldRule::single("apc_usd", "apc_usd"),
    FieldRule::flatten("summary_stats", "summary_stats"),
    FieldRule::join("issn", "issn[]", MergeStrategy::DedupeJoin),
    FieldRule::names("host_organization_lineage_names", "host_organization_lineage_names[]"),
    FieldRule::names("topics_display_name", "topics[].display_name"),
    FieldRule::names("alternate_titles", "alternate_titles[]"),
];

const INSTITUTIONS: &[FieldRule] = &[
    FieldRule::date("created_date"),
    FieldRule::date("updated_date"),
    FieldRule::single("ror", "ids.ror"),
    FieldRule::single("grid", "ids.grid"),
    FieldRule::single("wikidata", "ids.wikidata"),
    FieldRule::flatten("geo", "geo"),
    FieldRule::flatten("summary_stats", "summary_stats"),
    FieldRule::names("associated_institutions_display_name", "associated_institutions[].display_name"),
    FieldRule::names("display_name_acronyms", "display_name_acronyms[]"),
    FieldRule::names("display_name_alternatives", "display_name_alternatives[]"),
    FieldRule::names("topics_display_name", "topics[].display_name"),
    FieldRule::join("lineage", "lineage[]", MergeStrategy::DedupeJoin),
];

const PUBLISHERS: &[FieldRule] = &[
    FieldRule::date("created_date"),
    FieldRule::date("updated_date"),
    FieldRule::single("ror", "ids.ror"),
    FieldRule::single("wikidata", "ids.wikidata"),
    FieldRule::flatten("summary_stats", "summary_stats"),
    FieldRule::names("alternate_titles", "alternate_titles[]"),
    FieldRule::join("country_codes", "country_codes[]", MergeStrategy::DedupeJoin),
    FieldRule::join("lineage", "lineage[]", MergeStrategy::DedupeJoin),
];

const TOPICS: &[FieldRule] = &[
    FieldRule::date("created_date"),
    FieldRule::date("updated_date"),
    FieldRule::single("wikipedia", "ids.wikipedia"),
    FieldRule::single("subfield_display_name", "subfield.display_name"),
    FieldRule::single("field_display_name", "field.display_name"),
    FieldRule::single("domain_display_name", "domain.display_name"),
    FieldRule::names("keywords", "keywords[]"),
    FieldRule::names("siblings_display_name", "siblings[].display_name"),
];

const FUNDERS: &[FieldRule] = &[
    FieldRule::date("created_date"),
    FieldRule::date("updated_date"),
    FieldRule::single("ror", "ids.ror"),
    FieldRule::single("crossref", "ids.crossref"),
    FieldRule::single("doi", "ids.doi"),
    FieldRule::flatten("summary_stats", "summary_stats"),
    FieldRule::names("alternate_titles", "alternate_titles[]"),
    FieldRule::names("roles_role", "roles[].role"),
];

/// Digest rules for `entity`
pub fn rules_for(entity: Entity) -> &'static [FieldRule] {
    match entity {
        Entity::Works => WORKS,
        Entity::Authors => AUTHORS,
        Entity::Sources => SOURCES,
        Entity::Institutions => INSTITUTIONS,
        Entity::Publishers => PUBLISHERS,
        Entity::Topics => TOPICS,
        Entity::Funders => FUNDERS,
    }
}
