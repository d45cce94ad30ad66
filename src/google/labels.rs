//! Part-of-speech tags and dependency labels of the Natural Language API
//!
//! The API reports both as enum names (`"VERB"`, `"NSUBJ"`). Names this
//! crate does not know map to `Unknown` so newer API versions still parse.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! api_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(from = "String", into = "&'static str")]
        pub enum $name {
            #[default]
            Unknown,
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $name::Unknown => "UNKNOWN",
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownName;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    "UNKNOWN" => Ok($name::Unknown),
                    $($text => Ok($name::$variant),)+
                    _ => Err(UnknownName(s.to_string())),
                }
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                s.parse().unwrap_or_else(|_| {
                    tracing::warn!(value = %s, kind = stringify!($name), "unrecognized enum value");
                    $name::Unknown
                })
            }
        }

        impl From<$name> for &'static str {
            fn from(value: $name) -> Self {
                value.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Name not present in the API's enum
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown name: {0}")]
pub struct UnknownName(pub String);

api_enum! {
    /// Coarse part-of-speech tag
    Tag {
        Adj => "ADJ",
        Adp => "ADP",
        Adv => "ADV",
        Conj => "CONJ",
        Det => "DET",
        Noun => "NOUN",
        Num => "NUM",
        Pron => "PRON",
        Prt => "PRT",
        Punct => "PUNCT",
        Verb => "VERB",
        X => "X",
        Affix => "AFFIX",
    }
}

api_enum! {
    /// Dependency edge label
    Label {
        Abbrev => "ABBREV",
        Acomp => "ACOMP",
        Advcl => "ADVCL",
        Advmod => "ADVMOD",
        Amod => "AMOD",
        Appos => "APPOS",
        Attr => "ATTR",
        Aux => "AUX",
        Auxpass => "AUXPASS",
        Cc => "CC",
        Ccomp => "CCOMP",
        Conj => "CONJ",
        Csubj => "CSUBJ",
        Csubjpass => "CSUBJPASS",
        Dep => "DEP",
        Det => "DET",
        Discourse => "DISCOURSE",
        Dobj => "DOBJ",
        Expl => "EXPL",
        Goeswith => "GOESWITH",
        Iobj => "IOBJ",
        Mark => "MARK",
        Mwe => "MWE",
        Mwv => "MWV",
        Neg => "NEG",
        Nn => "NN",
        Npadvmod => "NPADVMOD",
        Nsubj => "NSUBJ",
        Nsubjpass => "NSUBJPASS",
        Num => "NUM",
        Number => "NUMBER",
        P => "P",
        Parataxis => "PARATAXIS",
        Partmod => "PARTMOD",
        Pcomp => "PCOMP",
        Pobj => "POBJ",
        Poss => "POSS",
        Postneg => "POSTNEG",
        Precomp => "PRECOMP",
        Preconj => "PRECONJ",
        Predet => "PREDET",
        Pref => "PREF",
        Prep => "PREP",
        Pronl => "PRONL",
        Prt => "PRT",
        Ps => "PS",
        Quantmod => "QUANTMOD",
        Rcmod => "RCMOD",
        Rcmodrel => "RCMODREL",
        Rdrop => "RDROP",
        Ref => "REF",
        Remnant => "REMNANT",
        Reparandum => "REPARANDUM",
        Root => "ROOT",
        Snum => "SNUM",
        Suff => "SUFF",
        Tmod => "TMOD",
        Topic => "TOPIC",
        Vmod => "VMOD",
        Vocative => "VOCATIVE",
        Xcomp => "XCOMP",
        Suffix => "SUFFIX",
        Title => "TITLE",
        Advphmod => "ADVPHMOD",
        Auxcaus => "AUXCAUS",
        Auxvv => "AUXVV",
        Dtmod => "DTMOD",
        Foreign => "FOREIGN",
        Kw => "KW",
        List => "LIST",
        Nomc => "NOMC",
        Nomcsubj => "NOMCSUBJ",
        Nomcsubjpass => "NOMCSUBJPASS",
        Numc => "NUMC",
        Cop => "COP",
        Dislocated => "DISLOCATED",
        Asp => "ASP",
        Gmod => "GMOD",
        Gobj => "GOBJ",
        Infmod => "INFMOD",
        Mes => "MES",
        Ncomp => "NCOMP",
    }
}
