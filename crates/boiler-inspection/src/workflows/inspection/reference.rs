//! Static lookup tables backing intake validation and report labels.
//!
//! Lookups never fail: an unknown region has no sub-regions and an unknown
//! product has no label.

use serde::Serialize;

use super::domain::{ChecklistCategory, TechnicalAttribute};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ChecklistItem {
    pub id: &'static str,
    pub label: &'static str,
    pub category: ChecklistCategory,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Product {
    pub id: &'static str,
    pub label: &'static str,
}

pub const CHECKLIST_SIZE: usize = 23;

pub static CHECKLIST_CATALOG: [ChecklistItem; CHECKLIST_SIZE] = [
    install("install_location", "설치 장소 적합성 (환기 및 점검 공간)"),
    install("exhaust_pipe_joint", "배기통 접속부 체결 및 밀폐 상태"),
    install("exhaust_pipe_slope", "배기통 구배 및 지지 상태"),
    install("exhaust_terminal", "배기구 외부 돌출 및 방조망 설치"),
    install("gas_pipe_connection", "가스 배관 연결 및 누설 여부"),
    install("gas_shutoff_valve", "가스 차단 밸브 설치 및 작동"),
    install("water_pipe_connection", "급수·급탕 배관 연결 상태"),
    install("heating_pipe_insulation", "난방 배관 보온 상태"),
    install("condensate_drain", "응축수 배수 처리 상태"),
    install("power_grounding", "전원 접지 및 전용 콘센트 사용"),
    install("wall_mounting", "본체 벽면 고정 상태"),
    install("safety_clearance", "가연물 이격 거리 확보"),
    operate("ignition_test", "점화 동작 정상 여부"),
    operate("flame_state", "연소 불꽃 상태"),
    operate("combustion_gas", "배기가스 CO 농도 적정"),
    operate("heating_operation", "난방 운전 정상 여부"),
    operate("hot_water_operation", "온수 운전 정상 여부"),
    operate("water_pressure", "난방수 압력 적정 (1~2bar)"),
    operate("circulation_pump", "순환 펌프 작동 및 소음"),
    operate("controller_display", "온도조절기 표시 및 통신 상태"),
    operate("error_history", "에러 코드 이력 확인"),
    operate("freeze_protection", "동파 방지 기능 작동"),
    operate("customer_guidance", "사용자 안전 사용 안내"),
];

const fn install(id: &'static str, label: &'static str) -> ChecklistItem {
    ChecklistItem {
        id,
        label,
        category: ChecklistCategory::Installation,
    }
}

const fn operate(id: &'static str, label: &'static str) -> ChecklistItem {
    ChecklistItem {
        id,
        label,
        category: ChecklistCategory::Operational,
    }
}

pub const PRODUCT_CATALOG: &[Product] = &[
    Product {
        id: "NCB790",
        label: "NCB790 콘덴싱 가스보일러",
    },
    Product {
        id: "NCB590",
        label: "NCB590 콘덴싱 가스보일러",
    },
    Product {
        id: "NCB390",
        label: "NCB390 콘덴싱 가스보일러",
    },
    Product {
        id: "NGB353",
        label: "NGB353 일반 가스보일러",
    },
    Product {
        id: "LST-30K",
        label: "LST-30K 기름보일러",
    },
    Product {
        id: "NPW-36K",
        label: "NPW-36K 콘덴싱 온수기",
    },
    Product {
        id: "NFB-500",
        label: "NFB-500 업소용 보일러",
    },
    Product {
        id: "NR-20",
        label: "NR-20 실내온도조절기",
    },
];

const REGIONS: &[(&str, &[&str])] = &[
    (
        "서울특별시",
        &[
            "강남구", "강동구", "강북구", "강서구", "관악구", "광진구", "구로구", "마포구",
            "서초구", "송파구", "영등포구", "용산구", "종로구", "중구",
        ],
    ),
    (
        "경기도",
        &[
            "고양시", "광명시", "김포시", "부천시", "성남시", "수원시", "안산시", "안양시",
            "용인시", "의정부시", "파주시", "화성시",
        ],
    ),
    (
        "인천광역시",
        &["계양구", "남동구", "부평구", "서구", "연수구", "중구"],
    ),
    (
        "부산광역시",
        &["남구", "동래구", "부산진구", "사하구", "수영구", "해운대구"],
    ),
    (
        "대전광역시",
        &["대덕구", "동구", "서구", "유성구", "중구"],
    ),
];

const FUEL_TYPES: &[&str] = &["LNG", "LPG", "등유", "전기"];
const EXHAUST_TYPES: &[&str] = &["FF (강제급배기)", "FE (강제배기)", "CF (자연배기)"];
const ELECTRICAL_SPECS: &[&str] = &["220V 단상", "380V 삼상"];
const PIPING_MATERIALS: &[&str] = &["동관", "XL관", "PB관", "스테인리스관"];
const WATER_SUPPLY_METHODS: &[&str] = &["직결식", "저수조식", "부스터펌프식"];
const CONTROL_METHODS: &[&str] = &["실내온도조절기", "각방제어", "원격제어 (IoT)"];
const USAGE_PURPOSES: &[&str] = &["가정용", "상업용", "산업용"];
const DELIVERY_TYPES: &[&str] = &["신규 설치", "교체 설치", "이전 설치"];

pub fn is_known_region(region: &str) -> bool {
    REGIONS.iter().any(|(name, _)| *name == region)
}

pub fn sub_regions(region: &str) -> &'static [&'static str] {
    REGIONS
        .iter()
        .find(|(name, _)| *name == region)
        .map(|(_, subs)| *subs)
        .unwrap_or(&[])
}

pub fn product_label(product_id: &str) -> Option<&'static str> {
    PRODUCT_CATALOG
        .iter()
        .find(|product| product.id == product_id)
        .map(|product| product.label)
}

pub fn checklist_item(id: &str) -> Option<&'static ChecklistItem> {
    CHECKLIST_CATALOG.iter().find(|item| item.id == id)
}

pub fn options(attribute: TechnicalAttribute) -> &'static [&'static str] {
    match attribute {
        TechnicalAttribute::Fuel => FUEL_TYPES,
        TechnicalAttribute::ExhaustType => EXHAUST_TYPES,
        TechnicalAttribute::Electrical => ELECTRICAL_SPECS,
        TechnicalAttribute::Piping => PIPING_MATERIALS,
        TechnicalAttribute::WaterSupply => WATER_SUPPLY_METHODS,
        TechnicalAttribute::Control => CONTROL_METHODS,
        TechnicalAttribute::Purpose => USAGE_PURPOSES,
        TechnicalAttribute::DeliveryType => DELIVERY_TYPES,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionView {
    pub region: &'static str,
    pub sub_regions: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionListView {
    pub attribute: TechnicalAttribute,
    pub key: &'static str,
    pub label: &'static str,
    pub options: &'static [&'static str],
}

/// Serializable copy of every table, served to form clients.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceSnapshot {
    pub regions: Vec<RegionView>,
    pub products: &'static [Product],
    pub checklist: &'static [ChecklistItem],
    pub technical_options: Vec<OptionListView>,
}

impl ReferenceSnapshot {
    pub fn current() -> Self {
        let regions = REGIONS
            .iter()
            .map(|&(region, sub_regions)| RegionView {
                region,
                sub_regions,
            })
            .collect();

        let technical_options = TechnicalAttribute::ordered()
            .into_iter()
            .map(|attribute| OptionListView {
                attribute,
                key: attribute.key(),
                label: attribute.label(),
                options: options(attribute),
            })
            .collect();

        Self {
            regions,
            products: PRODUCT_CATALOG,
            checklist: &CHECKLIST_CATALOG,
            technical_options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn checklist_catalog_has_unique_ids_in_both_categories() {
        let ids: HashSet<_> = CHECKLIST_CATALOG.iter().map(|item| item.id).collect();
        assert_eq!(ids.len(), CHECKLIST_SIZE);

        let installation = CHECKLIST_CATALOG
            .iter()
            .filter(|item| item.category == ChecklistCategory::Installation)
            .count();
        assert_eq!(installation, 12);
        assert_eq!(CHECKLIST_SIZE - installation, 11);
    }

    #[test]
    fn unknown_region_has_no_sub_regions() {
        assert!(sub_regions("제주특별자치도").is_empty());
        assert!(sub_regions("").is_empty());
        assert!(sub_regions("서울특별시").contains(&"강남구"));
        assert!(!sub_regions("경기도").contains(&"강남구"));
    }

    #[test]
    fn every_attribute_has_options() {
        for attribute in TechnicalAttribute::ordered() {
            assert!(!options(attribute).is_empty(), "{attribute:?} has no options");
        }
        assert_eq!(product_label("NCB790"), Some("NCB790 콘덴싱 가스보일러"));
        assert_eq!(product_label("missing"), None);
    }
}
