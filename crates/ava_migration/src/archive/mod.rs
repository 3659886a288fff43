//! 素材归档（archive app）的迁移记录

pub mod m0001_initial;
pub mod m0007_auto_20170320_1532;
pub mod m0011_auto_20170405_1049;
pub mod m0012_take_flag;
