use crate::core::*;

use super::xml_utils::XmlWriter;

/// Write `GrpHdr` for `variant` with the given message totals.
///
/// Element order is fixed by the pain schemas: MsgId, CreDtTm, BtchBookg,
/// NbOfTxs, CtrlSum, Grpg, InitgPty (Nm, Id, PstlAdr).
pub fn write_group_header(
    w: &mut XmlWriter,
    header: &GroupHeader,
    variant: SchemaVariant,
    totals: ControlTotals,
) -> Result<(), SepaError> {
    check_group_header(header)?;

    w.start_element("GrpHdr")?;
    w.text_element("MsgId", header.message_identification())?;
    w.text_element("CreDtTm", header.creation_date_time())?;
    if variant.emits(GatedField::BatchBooking) {
        w.text_element("BtchBookg", bool_to_token(header.batch_booking()))?;
    }
    w.text_element("NbOfTxs", &totals.count.to_string())?;
    w.text_element("CtrlSum", &totals.formatted_sum())?;
    if variant.emits(GatedField::Grouping) {
        w.text_element("Grpg", GROUPING_MIXED)?;
    }

    w.start_element("InitgPty")?;
    w.text_element("Nm", header.initiating_party_name())?;
    match header.identity() {
        Some(PartyIdentity::Organisation { id, issuer }) => {
            w.start_element("Id")?;
            w.start_element("OrgId")?;
            w.start_element("Othr")?;
            w.text_element("Id", id)?;
            if let Some(issuer) = issuer {
                w.text_element("Issr", issuer)?;
            }
            w.end_element("Othr")?;
            w.end_element("OrgId")?;
            w.end_element("Id")?;
        }
        Some(PartyIdentity::Private { id }) => {
            w.start_element("Id")?;
            w.start_element("PrvtId")?;
            w.nested_text_element("Othr", "Id", id)?;
            w.end_element("PrvtId")?;
            w.end_element("Id")?;
        }
        None => {}
    }
    if let Some((line, country)) = header.postal_address() {
        w.start_element("PstlAdr")?;
        w.text_element("AdrLine", line)?;
        w.text_element("Ctry", country)?;
        w.end_element("PstlAdr")?;
    }
    w.end_element("InitgPty")?;

    w.end_element("GrpHdr")?;
    Ok(())
}

/// Render-time requirements of a header: a non-empty `MsgId`.
pub(crate) fn check_group_header(header: &GroupHeader) -> Result<(), SepaError> {
    if header.message_identification().trim().is_empty() {
        return Err(ValidationError::required("group_header.message_identification").into());
    }
    Ok(())
}

/// Render a standalone `GrpHdr` fragment.
pub fn group_header_xml(
    header: &GroupHeader,
    variant: SchemaVariant,
    totals: ControlTotals,
) -> Result<String, SepaError> {
    let mut w = XmlWriter::fragment();
    write_group_header(&mut w, header, variant, totals)?;
    w.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn header() -> GroupHeader {
        let mut h = GroupHeader::new();
        h.set_message_identification("MSG-1")
            .unwrap()
            .set_initiating_party_name("ACME")
            .unwrap();
        h.set_creation_date_time("2024-06-15T10:00:00");
        h
    }

    #[test]
    fn legacy_credit_transfer_fields() {
        let mut h = header();
        h.set_batch_booking(true);
        let totals = ControlTotals::new(2, dec!(7));
        let legacy = group_header_xml(&h, SchemaVariant::Pain001_001_02, totals).unwrap();
        assert!(legacy.contains("<BtchBookg>true</BtchBookg>"));
        assert!(legacy.contains("<Grpg>MIXD</Grpg>"));
        let pos = |tag: &str| legacy.find(tag).unwrap();
        assert!(pos("<CreDtTm>") < pos("<BtchBookg>"));
        assert!(pos("<BtchBookg>") < pos("<NbOfTxs>"));
        assert!(pos("<CtrlSum>") < pos("<Grpg>"));
        assert!(pos("<Grpg>") < pos("<InitgPty>"));

        for v in [SchemaVariant::Pain001_001_03, SchemaVariant::Pain008_001_02] {
            let xml = group_header_xml(&h, v, totals).unwrap();
            assert!(!xml.contains("BtchBookg"), "{v}");
            assert!(!xml.contains("Grpg"), "{v}");
        }
    }

    #[test]
    fn missing_message_id_is_rejected() {
        let mut h = GroupHeader::new();
        h.set_initiating_party_name("ACME").unwrap();
        let err = group_header_xml(&h, SchemaVariant::Pain008_001_02, ControlTotals::ZERO)
            .unwrap_err();
        assert!(matches!(err, SepaError::Validation(_)));
    }

    #[test]
    fn private_identity_block() {
        let mut h = header();
        h.set_private_identification("DE98ZZZ09999999999");
        let xml = group_header_xml(&h, SchemaVariant::Pain008_001_02, ControlTotals::ZERO).unwrap();
        assert!(xml.contains(
            "<PrvtId>\n        <Othr>\n          <Id>DE98ZZZ09999999999</Id>"
        ));
        assert!(!xml.contains("OrgId"));
    }
}
