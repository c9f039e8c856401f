//! Resource catalog
//!
//! The content resources the university site shows, with their endpoints,
//! locale parameter, envelope key, field aliases and display layout.

use crate::error::{AppError, AppResult};
use crate::i18n::Locale;
use crate::resource::{EndpointTemplate, FieldAliases, LocaleParam, ResourceRequest};
use std::fmt;
use std::str::FromStr;

/// How a resource is laid out when rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Dated steps, oldest first
    Timeline,
    /// Title + summary cards
    Cards,
    /// A single record
    Detail,
    /// Rows with numeric columns
    Table,
}

/// Known content resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    News,
    NewsItem,
    Faculties,
    Faculty,
    Accreditations,
    Quotas,
    HistorySteps,
    StudentServices,
}

type AliasTable = &'static [(&'static str, &'static [&'static str])];

/// Static description of one resource
#[derive(Debug, Clone, Copy)]
pub struct ResourceSpec {
    pub kind: ResourceKind,
    /// Name used on the command line
    pub name: &'static str,
    pub endpoint: &'static str,
    pub locale_param: LocaleParam,
    pub domain_key: &'static str,
    pub aliases: AliasTable,
    pub layout: Layout,
    titles: [&'static str; 3],
}

impl ResourceSpec {
    /// Section title in the given locale
    pub fn title(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::Ru => self.titles[0],
            Locale::En => self.titles[1],
            Locale::Kg => self.titles[2],
        }
    }

    /// Params that must be supplied to build a URL
    pub fn required_params(&self) -> Vec<String> {
        EndpointTemplate::new(self.endpoint)
            .placeholders()
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Request for this resource in `locale`
    pub fn request(&self, locale: Locale) -> ResourceRequest {
        ResourceRequest::new(self.endpoint, locale)
            .with_locale_param(self.locale_param)
            .with_domain_key(self.domain_key)
            .with_aliases(FieldAliases::from_table(self.aliases))
    }
}

const TITLE_ALIASES: (&str, &[&str]) = ("title", &["name", "info.title", "info.name"]);
const DESCRIPTION_ALIASES: (&str, &[&str]) = ("description", &["info.description", "content", "text"]);

static CATALOG: [ResourceSpec; 8] = [
    ResourceSpec {
        kind: ResourceKind::News,
        name: "news",
        endpoint: "/api/news/news/",
        locale_param: LocaleParam::Lang,
        domain_key: "news",
        aliases: &[
            TITLE_ALIASES,
            ("summary", &["short_description", "info.short_description", "description"]),
            ("published_at", &["date", "created_at"]),
        ],
        layout: Layout::Cards,
        titles: ["Новости", "News", "Жаңылыктар"],
    },
    ResourceSpec {
        kind: ResourceKind::NewsItem,
        name: "news-item",
        endpoint: "/api/news/news/{id}/",
        locale_param: LocaleParam::Lang,
        domain_key: "news",
        aliases: &[TITLE_ALIASES, DESCRIPTION_ALIASES, ("published_at", &["date", "created_at"])],
        layout: Layout::Detail,
        titles: ["Новость", "News article", "Жаңылык"],
    },
    ResourceSpec {
        kind: ResourceKind::Faculties,
        name: "faculties",
        endpoint: "/api/academy/faculties/",
        locale_param: LocaleParam::Language,
        domain_key: "faculties",
        aliases: &[TITLE_ALIASES, ("summary", &["info.description", "description"])],
        layout: Layout::Cards,
        titles: ["Факультеты", "Faculties", "Факультеттер"],
    },
    ResourceSpec {
        kind: ResourceKind::Faculty,
        name: "faculty",
        endpoint: "/api/academy/faculties/{id}/",
        locale_param: LocaleParam::Language,
        domain_key: "faculty",
        aliases: &[TITLE_ALIASES, DESCRIPTION_ALIASES],
        layout: Layout::Detail,
        titles: ["Факультет", "Faculty", "Факультет"],
    },
    ResourceSpec {
        kind: ResourceKind::Accreditations,
        name: "accreditations",
        endpoint: "/api/academy/accreditations/",
        locale_param: LocaleParam::Lang,
        domain_key: "accreditations",
        aliases: &[TITLE_ALIASES, ("summary", &["description", "info.description"])],
        layout: Layout::Cards,
        titles: ["Аккредитация", "Accreditation", "Аккредитация"],
    },
    ResourceSpec {
        kind: ResourceKind::Quotas,
        name: "quotas",
        endpoint: "/api/admission/quotas/",
        locale_param: LocaleParam::Locale,
        domain_key: "quotas",
        aliases: &[("title", &["name", "program", "speciality"])],
        layout: Layout::Table,
        titles: ["Квоты", "Quotas", "Квоталар"],
    },
    ResourceSpec {
        kind: ResourceKind::HistorySteps,
        name: "history-steps",
        endpoint: "/api/academy/history-steps/",
        locale_param: LocaleParam::Lang,
        domain_key: "history_steps",
        aliases: &[TITLE_ALIASES, DESCRIPTION_ALIASES],
        layout: Layout::Timeline,
        titles: ["История", "History", "Тарых"],
    },
    ResourceSpec {
        kind: ResourceKind::StudentServices,
        name: "student-services",
        endpoint: "/api/students/services/",
        locale_param: LocaleParam::Lang,
        domain_key: "services",
        aliases: &[TITLE_ALIASES, ("summary", &["description", "info.description"])],
        layout: Layout::Cards,
        titles: ["Студентам", "Student services", "Студенттерге"],
    },
];

impl ResourceKind {
    /// Every resource, in catalog order
    pub fn all() -> impl Iterator<Item = ResourceKind> {
        CATALOG.iter().map(|spec| spec.kind)
    }

    pub fn spec(&self) -> &'static ResourceSpec {
        CATALOG
            .iter()
            .find(|spec| spec.kind == *self)
            .unwrap_or(&CATALOG[0])
    }

    pub fn name(&self) -> &'static str {
        self.spec().name
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceKind {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        CATALOG
            .iter()
            .find(|spec| spec.name == wanted)
            .map(|spec| spec.kind)
            .ok_or_else(|| AppError::UnknownResource(s.to_string()))
    }
}
