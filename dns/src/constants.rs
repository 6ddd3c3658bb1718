pub const DNS_HEADER_LEN: usize = 12;

// rfc1035 2.3.4
pub const MAX_LABEL_LEN: usize = 63;
pub const MAX_NAME_LEN: usize = 255;

// byte offset, bit offset, name, for easier enumeration/display only
// caution: in rfc1035 4.1.1 (and rfc6895 2), 0 actually denotes the highest bit
// ad and cd are introduced in rfc2535 6.7
pub const FLAGS: &[(u8, u8, &str)] = &[
	(2, 7, "qr"), // query or response
	// 4 bits gap here is opcode
	(2, 2, "aa"), // authoritative answer
	(2, 1, "tc"), // truncated
	(2, 0, "rd"), // recursive desired
	(3, 7, "ra"), // recursive available
	(3, 6, "z"),  // zero
	(3, 5, "ad"), // authentic data
	(3, 4, "cd"), // checking disabled
];
// 4 bits afterwards is rcode

// OpCode, 3 is unassigned
const OPCODE_TABLE: &[(u8, &str)] = &[
	(0, "Query"),
	(1, "IQuery"),
	(2, "Status"),
	(4, "Notify"),
	(5, "Update"),
	(6, "DSO"),
];

const RCODE_TABLE: &[(u8, &str)] = &[
	(0, "NoError"),
	(1, "FormErr"),
	(2, "ServFail"),
	(3, "NXDomain"),
	(4, "NotImp"),
	(5, "Refused"),
];

// Class, mnemonics as in zone files
pub const CLASS_IN: u16 = 1;
const CLASS_TABLE: &[(u16, &str)] = &[
	(CLASS_IN, "IN"),
	(2, "CS"),
	(3, "CH"),
	(4, "HS"),
	(254, "NONE"),
	(255, "ANY"),
];

// Type
pub const TYPE_A: u16 = 1;
pub const TYPE_AAAA: u16 = 28;
pub const TYPE_TXT: u16 = 16;
const TYPE_TABLE: &[(u16, &str)] = &[
	(TYPE_A, "A"),
	(2, "NS"),
	(5, "CNAME"),
	(6, "SOA"),
	(12, "PTR"),
	(13, "HINFO"),
	(15, "MX"),
	(TYPE_TXT, "TXT"),
	(17, "RP"),
	(18, "AFSDB"),
	(24, "SIG"),
	(25, "KEY"),
	(TYPE_AAAA, "AAAA"),
	(29, "LOC"),
	(33, "SRV"),
	(35, "NAPTR"),
	(36, "KX"),
	(37, "CERT"),
	(39, "DNAME"),
	(41, "OPT"),
	(42, "APL"),
	(43, "DS"),
	(44, "SSHFP"),
	(45, "IPSECKEY"),
	(46, "RRSIG"),
	(47, "NSEC"),
	(48, "DNSKEY"),
	(49, "DHCID"),
	(50, "NSEC3"),
	(51, "NSEC3PARAM"),
	(52, "TLSA"),
	(53, "SMIMEA"),
	(55, "HIP"),
	(59, "CDS"),
	(60, "CDNSKEY"),
	(61, "OPENPGPKEY"),
	(62, "CSYNC"),
	(63, "ZONEMD"),
	(64, "SVCB"),
	(65, "HTTPS"),
	(99, "SPF"),
	(108, "EUI48"),
	(109, "EUI64"),
	(249, "TKEY"),
	(250, "TSIG"),
	(251, "IXFR"),
	(252, "AXFR"),
	(255, "ANY"),
	(256, "URI"),
	(257, "CAA"),
];

pub fn opcode2str(c: u8) -> &'static str {
	lookup(OPCODE_TABLE, c).unwrap_or("NotImplemented")
}

pub fn rcode2str(c: u8) -> &'static str {
	lookup(RCODE_TABLE, c).unwrap_or("NotImplemented")
}

// unknown classes and types use the rfc3597 5 generic notation

pub fn class2str(c: u16) -> String {
	match lookup(CLASS_TABLE, c) {
		Some(s) => s.to_owned(),
		None => format!("CLASS{c}"),
	}
}

pub fn type2str(c: u16) -> String {
	match lookup(TYPE_TABLE, c) {
		Some(s) => s.to_owned(),
		None => format!("TYPE{c}"),
	}
}

fn lookup<T: PartialEq + Copy>(table: &'static [(T, &'static str)], c: T) -> Option<&'static str> {
	table.iter().find(|&&(k, _)| k == c).map(|&(_, v)| v)
}
