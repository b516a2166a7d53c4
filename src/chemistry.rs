/// element records of the periodic table browser
///
///  # Examples
/// ```
/// use chemverse::chemistry::elements::{ElementCategory, normalize_symbol};
/// assert_eq!(normalize_symbol(" fe"), "Fe");
/// let category: ElementCategory = "noble gas".parse().unwrap();
/// assert_eq!(category.as_str(), "noble-gas");
/// ```
pub mod elements;
/// curated reactions and the canonical reactant set used as their key
///
/// The set of reactants is order independent: {H, O} and {O, H} normalize to the same
/// sorted, de-duplicated key.
/// # Examples
/// ```
/// use chemverse::chemistry::reactions::ReactantSet;
/// let a = ReactantSet::new(["O", "H"]);
/// let b = ReactantSet::new(["h", "o", "H"]);
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "H + O");
/// ```
pub mod reactions;
/// static lessons of the knowledge center
pub mod lessons;
/// read-only lookup tables built once at startup
///
///  # Examples
/// ```
/// use chemverse::chemistry::storage::ChemStore;
/// let store = ChemStore::seeded().unwrap();
/// let water = store.reactions.find_by_symbols(&["O", "H"]).unwrap();
/// assert_eq!(water.product, "H₂O");
/// let iron = store.elements.get_by_symbol("Fe").unwrap();
/// assert_eq!(iron.atomic_number, 26);
/// ```
pub mod storage;
