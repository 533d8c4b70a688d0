//! Attribute keys and values that tag layers and groups in map text

pub(super) const CLASSNAME_KEY: &str = "classname";
pub(super) const WORLDSPAWN_CLASSNAME: &str = "worldspawn";
pub(super) const GROUP_CLASSNAME: &str = "func_group";

pub(super) const TYPE_KEY: &str = "_tb_type";
pub(super) const NAME_KEY: &str = "_tb_name";
pub(super) const ID_KEY: &str = "_tb_id";
pub(super) const LAYER_KEY: &str = "_tb_layer";
pub(super) const GROUP_KEY: &str = "_tb_group";
pub(super) const LAYER_TYPE: &str = "_tb_layer";
pub(super) const GROUP_TYPE: &str = "_tb_group";
pub(super) const LAYER_SORT_INDEX_KEY: &str = "_tb_layer_sort_index";
pub(super) const LAYER_LOCKED_KEY: &str = "_tb_layer_locked";
pub(super) const LAYER_HIDDEN_KEY: &str = "_tb_layer_hidden";
pub(super) const LAYER_OMIT_FROM_EXPORT_KEY: &str = "_tb_layer_omit_from_export";

/// Value of a set layer flag
pub(super) const FLAG_SET: &str = "1";
