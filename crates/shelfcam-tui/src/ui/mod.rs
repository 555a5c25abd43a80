pub(crate) mod confirm;
pub(crate) mod filter_list;
pub(crate) mod modal;
pub(crate) mod text;
