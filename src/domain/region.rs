use serde::{Deserialize, Serialize};
use std::fmt;

/// 地域が判定できなかった記事に付けるラベル
pub const UNKNOWN_REGION: &str = "Unknown";

/// 分類対象の9地域
///
/// 宣言順は同点時の優先順位でもある（先に宣言された地域が勝つ）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "Hovedstadsområdet")]
    Hovedstadsomraadet,
    #[serde(rename = "Bornholm")]
    Bornholm,
    #[serde(rename = "Syd og Sønderjylland")]
    SydOgSoenderjylland,
    #[serde(rename = "Fyn")]
    Fyn,
    #[serde(rename = "Midt- og Vestjylland")]
    MidtOgVestjylland,
    #[serde(rename = "Nordjylland")]
    Nordjylland,
    #[serde(rename = "Trekantområdet")]
    Trekantomraadet,
    #[serde(rename = "Sjælland")]
    Sjaelland,
    #[serde(rename = "Østjylland")]
    Oestjylland,
}

impl Region {
    /// 全地域（宣言順）
    pub const ALL: [Region; 9] = [
        Region::Hovedstadsomraadet,
        Region::Bornholm,
        Region::SydOgSoenderjylland,
        Region::Fyn,
        Region::MidtOgVestjylland,
        Region::Nordjylland,
        Region::Trekantomraadet,
        Region::Sjaelland,
        Region::Oestjylland,
    ];

    /// 保存・表示に使う地域名
    pub fn name(&self) -> &'static str {
        match self {
            Region::Hovedstadsomraadet => "Hovedstadsområdet",
            Region::Bornholm => "Bornholm",
            Region::SydOgSoenderjylland => "Syd og Sønderjylland",
            Region::Fyn => "Fyn",
            Region::MidtOgVestjylland => "Midt- og Vestjylland",
            Region::Nordjylland => "Nordjylland",
            Region::Trekantomraadet => "Trekantområdet",
            Region::Sjaelland => "Sjælland",
            Region::Oestjylland => "Østjylland",
        }
    }

    /// 地域名から地域を引く
    pub fn from_name(name: &str) -> Option<Region> {
        Region::ALL.into_iter().find(|region| region.name() == name)
    }

    /// 地域に属する地名キーワード
    ///
    /// "Høje-Taastrup"や"Nykøbing Falster"のように単一の英字トークンにならない
    /// キーワードも元データどおり保持している（分類では一致しない）。
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Region::Hovedstadsomraadet => &[
                "København", "Frederiksberg", "Amager", "Dragør", "Tårnby", "Hvidovre",
                "Rødovre", "Glostrup", "Brøndby", "Herlev", "Ballerup", "Gentofte", "Lyngby",
                "Gladsaxe", "Ishøj", "Vallensbæk", "Høje-Taastrup", "Albertslund", "Egedal",
                "Furesø", "Rudersdal",
            ],
            Region::Bornholm => &[
                "Bornholm", "Rønne", "Nexø", "Aakirkeby", "Allinge", "Gudhjem", "Hasle",
                "Svaneke", "Østermarie",
            ],
            Region::SydOgSoenderjylland => &[
                "Esbjerg", "Haderslev", "Aabenraa", "Sønderborg", "Tønder", "Varde", "Vejen",
                "Fanø", "Ribe", "Gråsten", "Bramming", "Nordborg", "Augustenborg", "Tinglev",
                "Toftlund", "Løgumkloster",
            ],
            Region::Fyn => &[
                "Odense", "Svendborg", "Nyborg", "Middelfart", "Assens", "Faaborg",
                "Kerteminde", "Ringe", "Bogense", "Munkebo", "Otterup", "Årslev", "Langeskov",
                "Marstal", "Ærøskøbing",
            ],
            Region::MidtOgVestjylland => &[
                "Herning", "Holstebro", "Viborg", "Skive", "Struer", "Ikast", "Ringkøbing",
                "Lemvig", "Silkeborg", "Brande", "Karup", "Kjellerup", "Haderup",
            ],
            Region::Nordjylland => &[
                "Aalborg", "Hjørring", "Frederikshavn", "Thisted", "Brønderslev", "Hobro",
                "Nørresundby", "Skagen", "Sæby", "Aabybro", "Løgstør", "Hirtshals", "Nibe",
                "Støvring", "Fjerritslev", "Hadsund", "Brovst", "Dronninglund",
            ],
            Region::Trekantomraadet => &[
                "Vejle", "Kolding", "Fredericia", "Billund", "Middelfart", "Give", "Børkop",
                "Egtved", "Jelling",
            ],
            Region::Sjaelland => &[
                "Roskilde", "Næstved", "Slagelse", "Køge", "Holbæk", "Kalundborg", "Ringsted",
                "Sorø", "Vordingborg", "Nykøbing Falster", "Faxe", "Nakskov", "Maribo",
                "Stege", "Præstø", "Haslev",
            ],
            Region::Oestjylland => &[
                "Aarhus", "Randers", "Horsens", "Skanderborg", "Grenaa", "Ebeltoft",
                "Hadsten", "Hammel", "Odder", "Hinnerup", "Hedensted", "Ry", "Tilst", "Rønde",
                "Samsø",
            ],
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 分類結果を保存用のラベルに変換する（`None`は"Unknown"）
pub fn region_label(region: Option<Region>) -> &'static str {
    region.map(|r| r.name()).unwrap_or(UNKNOWN_REGION)
}
