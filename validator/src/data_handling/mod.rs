pub mod tfpn_bed;
