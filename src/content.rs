//! Static side content: suggested questions and quick-resource links

/// A canned question offered at the start of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    pub label: &'static str,
    pub query: &'static str,
}

/// A link shown in the resources sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    pub title: &'static str,
    pub url: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

pub const SUGGESTIONS: &[Suggestion] = &[
    Suggestion {
        label: "🎭 Dinámica familia Paganini",
        query: "¿Cómo es la actividad de role-play de las dos familias?",
    },
    Suggestion {
        label: "📉 Gastos desubicados",
        query: "Explicame la dinámica de clasificación de gastos.",
    },
    Suggestion {
        label: "💳 Deuda buena vs mala",
        query: "¿Cuáles son las definiciones de deuda buena y mala según la guía?",
    },
    Suggestion {
        label: "🎯 Fijando metas",
        query: "¿Cómo ayudar a los participantes a definir sus metas financieras?",
    },
];

pub const RESOURCES: &[Resource] = &[
    Resource {
        title: "Web Cuentas Sanas",
        url: "https://www.cuentassanas.com.ar/",
        description: "Portal de herramientas y cursos",
        icon: "🌐",
    },
    Resource {
        // the guide itself is embedded in the system instruction
        title: "Guía del orientador",
        url: "#",
        description: "Material base del taller (PDF)",
        icon: "📘",
    },
];

/// Look up a suggestion by its 1-based position, as shown to the user
pub fn suggestion(number: usize) -> Option<&'static Suggestion> {
    number.checked_sub(1).and_then(|index| SUGGESTIONS.get(index))
}
