//! Demo content loaded into a fresh portal.
//!
//! Timestamps are relative to `now` so the data always looks recent.

use chrono::{DateTime, Duration, Utc};

use esst_auth::directory::{BERNARD_ID, DUBOIS_ID, MARTIN_ID};
use esst_core::{ConversationId, FormationId, MediaId, MessageId, NewsId, PageId, ProjectId};

use crate::cms::{Page, PageMeta, PageStatus};
use crate::formations::{Formation, NewsItem};
use crate::media::{Dimensions, MediaItem, MediaType};
use crate::messaging::{Conversation, Message};
use crate::projects::{Project, ProjectStatus};
use crate::settings::{
    AppearanceSettings, ContactSettings, GeneralSettings, MaintenanceSettings, SeoSettings,
    SiteSettings,
};

pub const DUBOIS_MARTIN_ID: ConversationId = ConversationId::seeded(1);
pub const AI_GROUP_ID: ConversationId = ConversationId::seeded(2);

pub const RECOMMENDER_PROJECT_ID: ProjectId = ProjectId::seeded(1);
pub const MOBILE_APP_PROJECT_ID: ProjectId = ProjectId::seeded(2);

pub const HOME_PAGE_ID: PageId = PageId::seeded(1);
pub const PRESENTATION_PAGE_ID: PageId = PageId::seeded(2);
pub const ADMISSION_PAGE_ID: PageId = PageId::seeded(3);

pub const CAMPUS_PHOTO_ID: MediaId = MediaId::seeded(1);

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn message(
    n: u128,
    conversation_id: ConversationId,
    sender_id: esst_core::UserId,
    content: &str,
    timestamp: DateTime<Utc>,
    is_read: bool,
) -> Message {
    Message {
        id: MessageId::seeded(n),
        conversation_id,
        sender_id,
        content: content.to_string(),
        timestamp,
        is_read,
        attachments: Vec::new(),
    }
}

pub fn conversations(now: DateTime<Utc>) -> Vec<Conversation> {
    let ago = |minutes: i64| now - Duration::minutes(minutes);
    let direct = DUBOIS_MARTIN_ID;

    let thread = vec![
        message(1, direct, DUBOIS_ID, "Bonjour ! Comment avancez-vous sur le projet final ?", ago(30), true),
        message(
            2,
            direct,
            MARTIN_ID,
            "Bonjour Professeur ! J'ai terminé la première partie et je travaille actuellement sur l'implémentation de l'algorithme.",
            ago(25),
            true,
        ),
        message(
            3,
            direct,
            DUBOIS_ID,
            "Excellent ! Pourriez-vous me l'envoyer pour révision ? J'aimerais voir votre approche.",
            ago(20),
            true,
        ),
        message(
            4,
            direct,
            MARTIN_ID,
            "Bien sûr ! Je vous l'envoie dans quelques minutes. J'ai aussi quelques questions sur la partie théorique.",
            ago(15),
            true,
        ),
        message(
            5,
            direct,
            DUBOIS_ID,
            "Parfait ! N'hésitez pas à me poser toutes vos questions. Je suis disponible cet après-midi pour en discuter.",
            ago(5),
            false,
        ),
        message(6, direct, DUBOIS_ID, "Concernant le projet final...", now, false),
    ];

    let group = vec![message(
        7,
        AI_GROUP_ID,
        BERNARD_ID,
        "Voici les références...",
        now - Duration::days(1),
        true,
    )];

    vec![
        Conversation::direct(direct, DUBOIS_ID, MARTIN_ID).with_messages(thread, 2),
        Conversation::group(AI_GROUP_ID, "Groupe Projet IA", vec![MARTIN_ID, BERNARD_ID, DUBOIS_ID])
            .with_messages(group, 0),
    ]
}

pub fn projects(now: DateTime<Utc>) -> Vec<Project> {
    vec![
        Project {
            id: RECOMMENDER_PROJECT_ID,
            title: "Système de Recommandation IA".to_string(),
            description: "Développement d'un système de recommandation utilisant l'intelligence artificielle pour améliorer l'expérience utilisateur.".to_string(),
            category: "Intelligence Artificielle".to_string(),
            participants: vec![DUBOIS_ID, MARTIN_ID, BERNARD_ID],
            created_by: DUBOIS_ID,
            created_at: now - Duration::days(7),
            status: ProjectStatus::Active,
            tags: strings(&["IA", "Machine Learning", "Python"]),
            resources: strings(&["dataset.csv", "research_papers.pdf"]),
        },
        Project {
            id: MOBILE_APP_PROJECT_ID,
            title: "Application Mobile Étudiante".to_string(),
            description: "Création d'une application mobile dédiée aux étudiants pour faciliter l'accès aux services universitaires.".to_string(),
            category: "Développement Mobile".to_string(),
            participants: vec![MARTIN_ID, BERNARD_ID],
            created_by: MARTIN_ID,
            created_at: now - Duration::days(14),
            status: ProjectStatus::Active,
            tags: strings(&["React Native", "Mobile", "UX/UI"]),
            resources: strings(&["mockups.fig", "specifications.docx"]),
        },
    ]
}

pub fn pages(now: DateTime<Utc>) -> Vec<Page> {
    vec![
        Page {
            id: HOME_PAGE_ID,
            title: "Accueil".to_string(),
            slug: "accueil".to_string(),
            content: "Contenu de la page d'accueil...".to_string(),
            status: PageStatus::Published,
            author: "Pierre Dupont".to_string(),
            last_modified: now - Duration::days(5),
            section: "Institution".to_string(),
            meta: PageMeta::default(),
            publish_date: Some((now - Duration::days(5)).date_naive()),
        },
        Page {
            id: PRESENTATION_PAGE_ID,
            title: "Présentation ESST".to_string(),
            slug: "presentation".to_string(),
            content: "Contenu de présentation de l'ESST...".to_string(),
            status: PageStatus::Published,
            author: "Pierre Dupont".to_string(),
            last_modified: now - Duration::days(4),
            section: "Institution".to_string(),
            meta: PageMeta::default(),
            publish_date: Some((now - Duration::days(4)).date_naive()),
        },
        Page {
            id: ADMISSION_PAGE_ID,
            title: "Admission 2025/2026".to_string(),
            slug: "admission-2025".to_string(),
            content: "Procédures d'admission pour l'année 2025/2026...".to_string(),
            status: PageStatus::Draft,
            author: "Marie Bernard".to_string(),
            last_modified: now,
            section: "Admission".to_string(),
            meta: PageMeta::default(),
            publish_date: None,
        },
    ]
}

pub fn news(now: DateTime<Utc>) -> Vec<NewsItem> {
    vec![
        NewsItem {
            id: NewsId::seeded(1),
            title: "Nouvelle Formation en Intelligence Artificielle".to_string(),
            excerpt: "L'ESST lance un nouveau programme de Master en Intelligence Artificielle pour la rentrée 2025.".to_string(),
            content: "Contenu complet de l'actualité...".to_string(),
            author: "Michel Dubois".to_string(),
            published_at: now - Duration::days(2),
            category: "Formation".to_string(),
            image_url: Some("https://images.pexels.com/photos/8386440/pexels-photo-8386440.jpeg?auto=compress&cs=tinysrgb&w=800".to_string()),
            tags: strings(&["IA", "Formation", "Master"]),
        },
        NewsItem {
            id: NewsId::seeded(2),
            title: "Collaboration Internationale Signée".to_string(),
            excerpt: "Partenariat stratégique avec l'Université de Stanford pour les échanges étudiants.".to_string(),
            content: "Détails du partenariat...".to_string(),
            author: "Pierre Dupont".to_string(),
            published_at: now - Duration::days(3),
            category: "International".to_string(),
            image_url: Some("https://images.pexels.com/photos/267885/pexels-photo-267885.jpeg?auto=compress&cs=tinysrgb&w=800".to_string()),
            tags: strings(&["International", "Partenariat"]),
        },
    ]
}

pub fn formations() -> Vec<Formation> {
    vec![
        Formation {
            id: FormationId::seeded(1),
            title: "Master en Intelligence Artificielle".to_string(),
            description: "Formation approfondie en IA, machine learning et deep learning.".to_string(),
            duration: "2 ans".to_string(),
            level: "Master".to_string(),
            department: "Informatique".to_string(),
            requirements: strings(&["Licence en informatique", "Bases en mathématiques", "Anglais B2"]),
            objectives: strings(&[
                "Maîtriser les algorithmes d'IA",
                "Développer des solutions innovantes",
                "Comprendre l'éthique de l'IA",
            ]),
        },
        Formation {
            id: FormationId::seeded(2),
            title: "Licence Sciences et Technologies".to_string(),
            description: "Formation généraliste en sciences et technologies.".to_string(),
            duration: "3 ans".to_string(),
            level: "Licence".to_string(),
            department: "Sciences".to_string(),
            requirements: strings(&["Baccalauréat scientifique", "Niveau correct en mathématiques"]),
            objectives: strings(&[
                "Acquérir les bases scientifiques",
                "Développer l'esprit critique",
                "Préparer la spécialisation",
            ]),
        },
    ]
}

fn media_item(
    n: u128,
    name: &str,
    media_type: MediaType,
    size: u64,
    uploaded_at: DateTime<Utc>,
    image: Option<(u32, u32, &str)>,
) -> MediaItem {
    MediaItem {
        id: MediaId::seeded(n),
        name: name.to_string(),
        media_type,
        url: format!("/media/{name}"),
        size,
        uploaded_at,
        dimensions: image.map(|(width, height, _)| Dimensions { width, height }),
        alt: image.map(|(_, _, alt)| alt.to_string()),
    }
}

pub fn media(now: DateTime<Utc>) -> Vec<MediaItem> {
    vec![
        media_item(
            1,
            "campus-esst.jpg",
            MediaType::Image,
            2_048_000,
            now - Duration::days(1),
            Some((1920, 1080, "Campus ESST")),
        ),
        media_item(
            2,
            "formation-ia.jpg",
            MediaType::Image,
            1_536_000,
            now - Duration::days(2),
            Some((1600, 900, "Formation Intelligence Artificielle")),
        ),
        media_item(
            3,
            "presentation-esst.pdf",
            MediaType::Document,
            5_120_000,
            now - Duration::days(3),
            None,
        ),
        media_item(
            4,
            "laboratoire-recherche.jpg",
            MediaType::Image,
            1_843_200,
            now - Duration::days(4),
            Some((1800, 1200, "Laboratoire de recherche")),
        ),
    ]
}

pub fn site_settings() -> SiteSettings {
    SiteSettings {
        general: GeneralSettings {
            site_name: "École Supérieure des Sciences et Technologies".to_string(),
            site_description: "Excellence & Innovation".to_string(),
            site_url: "https://esst.edu".to_string(),
            admin_email: "admin@esst.edu".to_string(),
        },
        contact: ContactSettings {
            phone: "+33 1 23 45 67 89".to_string(),
            email: "contact@esst.edu".to_string(),
            address: "123 Avenue de l'Innovation, 75001 Paris, France".to_string(),
            facebook: "https://facebook.com/esst".to_string(),
            twitter: "https://twitter.com/esst".to_string(),
            linkedin: "https://linkedin.com/company/esst".to_string(),
        },
        appearance: AppearanceSettings {
            primary_color: "#1A4B8C".to_string(),
            secondary_color: "#4D88D8".to_string(),
            accent_color: "#FFD700".to_string(),
            logo: String::new(),
            favicon: String::new(),
        },
        seo: SeoSettings {
            meta_title: "ESST - École Supérieure des Sciences et Technologies".to_string(),
            meta_description: "Formation d'excellence en sciences et technologies. \
                Découvrez nos programmes innovants et rejoignez notre communauté académique."
                .to_string(),
            meta_keywords: "ESST, école, sciences, technologies, formation, université".to_string(),
            google_analytics: String::new(),
            facebook_pixel: String::new(),
        },
        maintenance: MaintenanceSettings {
            enabled: false,
            message: "Site en maintenance. Nous reviendrons bientôt.".to_string(),
        },
    }
}
