//! Page metadata and sitemap generation

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::SiteConfig;
use crate::models::photography_type::Category;

const OG_IMAGE_WIDTH: u32 = 1200;
const OG_IMAGE_HEIGHT: u32 = 630;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OpenGraphImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OpenGraph {
    #[serde(rename = "type")]
    pub kind: String,
    pub locale: String,
    pub alternate_locale: Vec<String>,
    pub site_name: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub images: Vec<OpenGraphImage>,
}

/// Metadata a page renders into its `<head>`
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub canonical: String,
    /// hreflang alternates, all pointing at the canonical URL
    pub languages: BTreeMap<String, String>,
    pub keywords: Vec<String>,
    pub open_graph: OpenGraph,
    pub robots: String,
}

/// Resolve `path` against the configured site URL
pub fn absolute_url(site: &SiteConfig, path: &str) -> String {
    let lower = path.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return path.to_string();
    }
    let base = site.site_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

fn service_areas(site: &SiteConfig) -> String {
    site.service_areas.join(" & ")
}

/// Build page metadata; `keywords` are appended to the site-wide ones
pub fn page_metadata(site: &SiteConfig, title: &str, description: &str, path: &str, keywords: &[String]) -> PageMetadata {
    let canonical = absolute_url(site, path);
    let image = absolute_url(site, &site.og_image_path);

    let mut all_keywords = Vec::with_capacity(site.keywords.len() + keywords.len() + 1);
    all_keywords.push(site.site_name.clone());
    all_keywords.extend(site.keywords.iter().cloned());
    for keyword in keywords {
        if !all_keywords.contains(keyword) {
            all_keywords.push(keyword.clone());
        }
    }

    let languages = [
        locale_tag(&site.locale),
        locale_tag(&site.alt_locale),
        "x-default".to_string(),
    ]
    .into_iter()
    .map(|lang| (lang, canonical.clone()))
    .collect();

    PageMetadata {
        title: title.to_string(),
        description: description.to_string(),
        languages,
        keywords: all_keywords,
        open_graph: OpenGraph {
            kind: "website".to_string(),
            locale: site.locale.clone(),
            alternate_locale: vec![site.alt_locale.clone()],
            site_name: site.site_name.clone(),
            url: canonical.clone(),
            title: title.to_string(),
            description: description.to_string(),
            images: vec![OpenGraphImage {
                url: image,
                width: OG_IMAGE_WIDTH,
                height: OG_IMAGE_HEIGHT,
                alt: format!("{} photography services in {}", site.site_name, site.service_areas.join(" and ")),
            }],
        },
        canonical,
        robots: "index, follow".to_string(),
    }
}

/// `en_MY` to `en-MY`
fn locale_tag(locale: &str) -> String {
    locale.replace('_', "-")
}

pub fn default_metadata(site: &SiteConfig, path: &str) -> PageMetadata {
    page_metadata(site, &site.default_title, &site.default_description, path, &[])
}

pub fn services_metadata(site: &SiteConfig) -> PageMetadata {
    page_metadata(
        site,
        &format!("Photography Services | {}", site.site_name),
        &format!("Photography services in {}. Book through WhatsApp.", service_areas(site)),
        "/services",
        &[],
    )
}

pub fn gallery_metadata(site: &SiteConfig) -> PageMetadata {
    page_metadata(
        site,
        &format!("Gallery | {}", site.site_name),
        &format!("Recent photography work by {} in {}.", site.site_name, service_areas(site)),
        "/gallery",
        &[],
    )
}

/// Hero copy and metadata of one service page
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServiceSeo {
    pub hero_title: String,
    pub hero_description: String,
    pub metadata: PageMetadata,
}

pub fn service_seo(site: &SiteConfig, category: &Category) -> ServiceSeo {
    let name = format!("{} Photography", category.name);
    let areas = service_areas(site);
    let keywords: Vec<String> = site
        .service_areas
        .iter()
        .map(|area| format!("{} {}", name.to_lowercase(), area))
        .collect();

    let title = format!("{} in {} | {}", name, areas, site.site_name);
    let description = format!(
        "Professional {} in {}. Book your session through WhatsApp.",
        name.to_lowercase(),
        areas
    );

    ServiceSeo {
        hero_title: name.clone(),
        hero_description: format!("{} sessions across {}.", name, areas),
        metadata: page_metadata(site, &title, &description, &format!("/services/{}", category.slug), &keywords),
    }
}

struct SitemapEntry {
    path: String,
    change_frequency: &'static str,
    priority: f32,
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// `sitemap.xml` listing the static pages and one page per service slug
pub fn sitemap_xml(site: &SiteConfig, service_slugs: &[String], now: DateTime<Utc>) -> String {
    let mut entries = vec![
        SitemapEntry { path: "/".to_string(), change_frequency: "weekly", priority: 1.0 },
        SitemapEntry { path: "/services".to_string(), change_frequency: "weekly", priority: 0.9 },
        SitemapEntry { path: "/gallery".to_string(), change_frequency: "weekly", priority: 0.8 },
    ];
    entries.extend(service_slugs.iter().map(|slug| SitemapEntry {
        path: format!("/services/{}", slug),
        change_frequency: "weekly",
        priority: 0.85,
    }));

    let lastmod = now.format("%Y-%m-%dT%H:%M:%SZ");
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        xml.push_str(&format!(
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.2}</priority>\n  </url>\n",
            xml_escape(&absolute_url(site, &entry.path)),
            lastmod,
            entry.change_frequency,
            entry.priority
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn site() -> SiteConfig {
        SiteConfig {
            site_url: "https://raygraphy.co/".to_string(),
            site_name: "Lumen".to_string(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_absolute_url() {
        let site = site();
        assert_eq!(absolute_url(&site, "/gallery"), "https://raygraphy.co/gallery");
        assert_eq!(absolute_url(&site, "gallery"), "https://raygraphy.co/gallery");
        assert_eq!(absolute_url(&site, "HTTPS://cdn.example.com/a.png"), "HTTPS://cdn.example.com/a.png");
    }

    #[test]
    fn test_service_seo() {
        let seo = service_seo(
            &site(),
            &Category { slug: "convocation".to_string(), name: "Convocation".to_string() },
        );
        assert_eq!(seo.hero_title, "Convocation Photography");
        assert_eq!(
            seo.metadata.title,
            "Convocation Photography in Kuala Lumpur & Selangor | Lumen"
        );
        assert_eq!(seo.metadata.canonical, "https://raygraphy.co/services/convocation");
        assert!(seo
            .metadata
            .keywords
            .contains(&"convocation photography Kuala Lumpur".to_string()));
        assert_eq!(seo.metadata.languages.len(), 3);
        assert_eq!(seo.metadata.languages["en-MY"], seo.metadata.canonical);
    }

    #[test]
    fn test_sitemap_lists_static_and_service_routes() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap();
        let xml = sitemap_xml(&site(), &["wedding".to_string(), "event".to_string()], now);
        assert_eq!(xml.matches("<url>").count(), 5);
        assert!(xml.contains("<loc>https://raygraphy.co/</loc>"));
        assert!(xml.contains("<loc>https://raygraphy.co/services/wedding</loc>"));
        assert!(xml.contains("<priority>0.85</priority>"));
        assert!(xml.contains("<lastmod>2024-03-10T08:00:00Z</lastmod>"));
    }
}
