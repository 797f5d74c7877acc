// The EVP pillar taxonomy — canonical categories for employee feedback.
//
// The registry is read-only configuration data: extending the taxonomy is a
// redeploy, not a runtime API. Descriptions are what get embedded; names are
// what appear in results.

use anyhow::Result;

use crate::embedding::traits::TextEmbedder;

/// One pillar of the employee value proposition.
#[derive(Debug, Clone, Copy)]
pub struct Pillar {
    pub name: &'static str,
    pub description: &'static str,
}

/// The canonical taxonomy, in declaration order.
///
/// Order matters only as the tie-break when two pillars score identically
/// against a comment — the matcher keeps the first-declared pillar.
pub const PILLARS: [Pillar; 12] = [
    Pillar {
        name: "Health & Wellbeing",
        description: "supporting physical, mental, emotional, and social health",
    },
    Pillar {
        name: "Financial Security & Benefits",
        description: "financial stability, savings, compensation, and insurance",
    },
    Pillar {
        name: "Learning & Development",
        description: "skill building, certifications, training, education programs",
    },
    Pillar {
        name: "Career Growth & Opportunity",
        description: "career pathways, internal mobility, leadership pipelines",
    },
    Pillar {
        name: "Flexibility & Work-Life Balance",
        description: "freedom, flexible working, hybrid models, personal autonomy",
    },
    Pillar {
        name: "Diversity, Equity & Inclusion (DEI)",
        description: "inclusion, diverse hiring, equitable opportunities",
    },
    Pillar {
        name: "Work Culture & Psychological Safety",
        description: "open communication, feedback, respectful culture",
    },
    Pillar {
        name: "CSR & Purpose",
        description: "social responsibility, sustainability, impact-driven work",
    },
    Pillar {
        name: "Recognition & Rewards",
        description: "employee rewards, celebrations, visible acknowledgment",
    },
    Pillar {
        name: "People-First Identity",
        description: "human-centric leadership, empathy, dignity for individuals",
    },
    Pillar {
        name: "Innovation & Entrepreneurship",
        description: "employee creativity, innovation, experimentation",
    },
    Pillar {
        name: "Global Collaboration & Belonging",
        description: "working across geographies, global teamwork, belonging",
    },
];

/// The registry with embeddings attached.
///
/// Built once per process and passed into the pipeline — pillar descriptions
/// are never re-encoded per submission. `names[i]` and `embeddings[i]`
/// describe the same pillar.
pub struct EmbeddedPillars {
    pub names: Vec<String>,
    pub embeddings: Vec<Vec<f64>>,
}

impl EmbeddedPillars {
    /// Encode every pillar description through the given embedder.
    pub async fn embed(embedder: &dyn TextEmbedder) -> Result<Self> {
        let texts: Vec<String> = PILLARS.iter().map(|p| p.description.to_string()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;
        let names = PILLARS.iter().map(|p| p.name.to_string()).collect();
        Ok(Self { names, embeddings })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
